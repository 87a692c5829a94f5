use super::TypeCoercer;
use crate::{ScalarKind, TypeDescriptor, TypeFactory, TypeFamily, TypeKind};
use serde::{Deserialize, Serialize};

/// Source side of the implicit-cast table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceClass {
    Null,
    ExactInteger,
    Approximate,
    Decimal,
    Boolean,
    Character,
    Binary,
    Date,
    Time,
    Timestamp,
    IntervalYearMonth,
    IntervalDayTime,
    Array,
    Map,
    Row,
}

impl SourceClass {
    /// Classify a descriptor
    pub fn of(ty: &TypeDescriptor) -> Self {
        match &ty.kind {
            TypeKind::Null => Self::Null,
            TypeKind::Boolean => Self::Boolean,
            TypeKind::ExactNumeric { .. } => Self::ExactInteger,
            TypeKind::Decimal { .. } => Self::Decimal,
            TypeKind::ApproxNumeric { .. } => Self::Approximate,
            TypeKind::Character { .. } => Self::Character,
            TypeKind::Binary { .. } => Self::Binary,
            TypeKind::Date => Self::Date,
            TypeKind::Time => Self::Time,
            TypeKind::Timestamp { .. } => Self::Timestamp,
            TypeKind::Interval { start, .. } if start.is_year_month() => Self::IntervalYearMonth,
            TypeKind::Interval { .. } => Self::IntervalDayTime,
            TypeKind::Array { .. } => Self::Array,
            TypeKind::Map { .. } => Self::Map,
            TypeKind::Row { .. } => Self::Row,
        }
    }
}

/// How a source reaches a target family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastRule {
    /// The source already belongs to the family
    Keep,
    /// The source's DECIMAL equivalent
    DecimalEquivalent,
    /// The family's default type
    FamilyDefault,
    /// DECIMAL with maximum precision and scale
    MaxDecimal,
    /// A scalar with default parameters
    Concrete(ScalarKind),
    /// No implicit cast exists
    Decline,
}

/// The implicit-cast table
///
/// Every `(source, family)` combination is listed.
pub const fn cast_rule(source: SourceClass, target: TypeFamily) -> CastRule {
    use CastRule::{Concrete, Decline, DecimalEquivalent, FamilyDefault, Keep, MaxDecimal};
    use SourceClass as S;
    use TypeFamily as T;

    match (source, target) {
        (S::Null, T::Null) => Keep,
        (
            S::Null,
            T::Boolean
            | T::Numeric
            | T::Integer
            | T::ExactNumeric
            | T::ApproximateNumeric
            | T::Decimal
            | T::Character
            | T::Binary
            | T::String
            | T::Date
            | T::Time
            | T::Timestamp
            | T::Datetime
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Array
            | T::Map,
        ) => FamilyDefault,

        (S::ExactInteger, T::Numeric | T::Integer | T::ExactNumeric) => Keep,
        (S::ExactInteger, T::Decimal) => DecimalEquivalent,
        (S::ExactInteger, T::Character | T::String) => Concrete(ScalarKind::VarChar),
        (
            S::ExactInteger,
            T::Null
            | T::Boolean
            | T::ApproximateNumeric
            | T::Binary
            | T::Date
            | T::Time
            | T::Timestamp
            | T::Datetime
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Array
            | T::Map,
        ) => Decline,

        (S::Approximate, T::Numeric | T::ApproximateNumeric) => Keep,
        (S::Approximate, T::Decimal | T::ExactNumeric) => DecimalEquivalent,
        (S::Approximate, T::Character | T::String) => Concrete(ScalarKind::VarChar),
        (
            S::Approximate,
            T::Null
            | T::Boolean
            | T::Integer
            | T::Binary
            | T::Date
            | T::Time
            | T::Timestamp
            | T::Datetime
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Array
            | T::Map,
        ) => Decline,

        (S::Decimal, T::Numeric | T::ExactNumeric | T::Decimal) => Keep,
        (S::Decimal, T::Character | T::String) => Concrete(ScalarKind::VarChar),
        (
            S::Decimal,
            T::Null
            | T::Boolean
            | T::Integer
            | T::ApproximateNumeric
            | T::Binary
            | T::Date
            | T::Time
            | T::Timestamp
            | T::Datetime
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Array
            | T::Map,
        ) => Decline,

        (S::Boolean, T::Boolean) => Keep,
        (S::Boolean, T::Character | T::String) => Concrete(ScalarKind::VarChar),
        (
            S::Boolean,
            T::Null
            | T::Numeric
            | T::Integer
            | T::ExactNumeric
            | T::ApproximateNumeric
            | T::Decimal
            | T::Binary
            | T::Date
            | T::Time
            | T::Timestamp
            | T::Datetime
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Array
            | T::Map,
        ) => Decline,

        (S::Character, T::Character | T::String) => Keep,
        (S::Character, T::Numeric | T::ExactNumeric | T::Decimal) => MaxDecimal,
        (S::Character, T::Integer) => Concrete(ScalarKind::BigInt),
        (S::Character, T::ApproximateNumeric) => Concrete(ScalarKind::Double),
        (S::Character, T::Date) => Concrete(ScalarKind::Date),
        (S::Character, T::Time) => Concrete(ScalarKind::Time),
        (S::Character, T::Timestamp | T::Datetime) => Concrete(ScalarKind::Timestamp),
        (S::Character, T::Binary) => Concrete(ScalarKind::VarBinary),
        (
            S::Character,
            T::Null | T::Boolean | T::IntervalYearMonth | T::IntervalDayTime | T::Array | T::Map,
        ) => Decline,

        (S::Binary, T::Binary | T::String) => Keep,
        (S::Binary, T::Character) => Concrete(ScalarKind::VarChar),
        (
            S::Binary,
            T::Null
            | T::Boolean
            | T::Numeric
            | T::Integer
            | T::ExactNumeric
            | T::ApproximateNumeric
            | T::Decimal
            | T::Date
            | T::Time
            | T::Timestamp
            | T::Datetime
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Array
            | T::Map,
        ) => Decline,

        (S::Date, T::Date | T::Datetime) => Keep,
        (S::Date, T::Timestamp) => Concrete(ScalarKind::Timestamp),
        (S::Date, T::Character | T::String) => Concrete(ScalarKind::VarChar),
        (
            S::Date,
            T::Null
            | T::Boolean
            | T::Numeric
            | T::Integer
            | T::ExactNumeric
            | T::ApproximateNumeric
            | T::Decimal
            | T::Binary
            | T::Time
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Array
            | T::Map,
        ) => Decline,

        (S::Time, T::Time | T::Datetime) => Keep,
        (S::Time, T::Character | T::String) => Concrete(ScalarKind::VarChar),
        (
            S::Time,
            T::Null
            | T::Boolean
            | T::Numeric
            | T::Integer
            | T::ExactNumeric
            | T::ApproximateNumeric
            | T::Decimal
            | T::Binary
            | T::Date
            | T::Timestamp
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Array
            | T::Map,
        ) => Decline,

        (S::Timestamp, T::Timestamp | T::Datetime) => Keep,
        (S::Timestamp, T::Date) => Concrete(ScalarKind::Date),
        (S::Timestamp, T::Character | T::String) => Concrete(ScalarKind::VarChar),
        (
            S::Timestamp,
            T::Null
            | T::Boolean
            | T::Numeric
            | T::Integer
            | T::ExactNumeric
            | T::ApproximateNumeric
            | T::Decimal
            | T::Binary
            | T::Time
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Array
            | T::Map,
        ) => Decline,

        (S::IntervalYearMonth, T::IntervalYearMonth) => Keep,
        (
            S::IntervalYearMonth,
            T::Null
            | T::Boolean
            | T::Numeric
            | T::Integer
            | T::ExactNumeric
            | T::ApproximateNumeric
            | T::Decimal
            | T::Character
            | T::Binary
            | T::String
            | T::Date
            | T::Time
            | T::Timestamp
            | T::Datetime
            | T::IntervalDayTime
            | T::Array
            | T::Map,
        ) => Decline,

        (S::IntervalDayTime, T::IntervalDayTime) => Keep,
        (
            S::IntervalDayTime,
            T::Null
            | T::Boolean
            | T::Numeric
            | T::Integer
            | T::ExactNumeric
            | T::ApproximateNumeric
            | T::Decimal
            | T::Character
            | T::Binary
            | T::String
            | T::Date
            | T::Time
            | T::Timestamp
            | T::Datetime
            | T::IntervalYearMonth
            | T::Array
            | T::Map,
        ) => Decline,

        (S::Array, T::Array) => Keep,
        (
            S::Array,
            T::Null
            | T::Boolean
            | T::Numeric
            | T::Integer
            | T::ExactNumeric
            | T::ApproximateNumeric
            | T::Decimal
            | T::Character
            | T::Binary
            | T::String
            | T::Date
            | T::Time
            | T::Timestamp
            | T::Datetime
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Map,
        ) => Decline,

        (S::Map, T::Map) => Keep,
        (
            S::Map,
            T::Null
            | T::Boolean
            | T::Numeric
            | T::Integer
            | T::ExactNumeric
            | T::ApproximateNumeric
            | T::Decimal
            | T::Character
            | T::Binary
            | T::String
            | T::Date
            | T::Time
            | T::Timestamp
            | T::Datetime
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Array,
        ) => Decline,

        // rows have no family
        (
            S::Row,
            T::Null
            | T::Boolean
            | T::Numeric
            | T::Integer
            | T::ExactNumeric
            | T::ApproximateNumeric
            | T::Decimal
            | T::Character
            | T::Binary
            | T::String
            | T::Date
            | T::Time
            | T::Timestamp
            | T::Datetime
            | T::IntervalYearMonth
            | T::IntervalDayTime
            | T::Array
            | T::Map,
        ) => Decline,
    }
}

impl<F: TypeFactory> TypeCoercer<F> {
    /// The type `source` is implicitly cast to in order to satisfy `family`
    ///
    /// Returns `None` when no implicit cast exists. The result keeps the
    /// source's nullability.
    pub fn implicit_cast(&self, source: &TypeDescriptor, family: TypeFamily) -> Option<TypeDescriptor> {
        let target = match cast_rule(SourceClass::of(source), family) {
            CastRule::Keep => return Some(source.clone()),
            CastRule::DecimalEquivalent => self.factory.decimal_equivalent_of(source)?,
            CastRule::FamilyDefault => self.factory.default_for_family(family),
            CastRule::MaxDecimal => self.factory.max_precision_scale_decimal(),
            CastRule::Concrete(kind) => self.factory.create_scalar(kind),
            CastRule::Decline => return None,
        };
        Some(target.with_nullable(source.nullable))
    }

    /// Whether `source` can be implicitly cast into `family`
    pub fn can_implicitly_cast(&self, source: &TypeDescriptor, family: TypeFamily) -> bool {
        !matches!(cast_rule(SourceClass::of(source), family), CastRule::Decline)
    }
}
