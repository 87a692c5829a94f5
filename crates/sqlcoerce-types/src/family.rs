//! Type families
//!
//! A family is a named set of type kinds used by operator signatures
//! ("operand 0 must be NUMERIC"). Every kind except ROW has exactly one
//! primary family; a family may contain kinds of several primary families
//! (`STRING` holds both character and binary strings).

use crate::{TypeDescriptor, TypeKind};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::fmt;

/// Type family tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeFamily {
    Null,
    Boolean,
    Numeric,
    Integer,
    ExactNumeric,
    ApproximateNumeric,
    Decimal,
    Character,
    Binary,
    String,
    Date,
    Time,
    Timestamp,
    Datetime,
    IntervalYearMonth,
    IntervalDayTime,
    Array,
    Map,
}

impl TypeFamily {
    /// Every family, in declaration order
    pub const ALL: [TypeFamily; 18] = [
        Self::Null,
        Self::Boolean,
        Self::Numeric,
        Self::Integer,
        Self::ExactNumeric,
        Self::ApproximateNumeric,
        Self::Decimal,
        Self::Character,
        Self::Binary,
        Self::String,
        Self::Date,
        Self::Time,
        Self::Timestamp,
        Self::Datetime,
        Self::IntervalYearMonth,
        Self::IntervalDayTime,
        Self::Array,
        Self::Map,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Boolean => "BOOLEAN",
            Self::Numeric => "NUMERIC",
            Self::Integer => "INTEGER",
            Self::ExactNumeric => "EXACT_NUMERIC",
            Self::ApproximateNumeric => "APPROXIMATE_NUMERIC",
            Self::Decimal => "DECIMAL",
            Self::Character => "CHARACTER",
            Self::Binary => "BINARY",
            Self::String => "STRING",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Datetime => "DATETIME",
            Self::IntervalYearMonth => "INTERVAL_YEAR_MONTH",
            Self::IntervalDayTime => "INTERVAL_DAY_TIME",
            Self::Array => "ARRAY",
            Self::Map => "MAP",
        }
    }

    /// Whether a descriptor's kind is a member of this family
    ///
    /// Nullability is irrelevant to membership.
    pub fn contains(&self, ty: &TypeDescriptor) -> bool {
        match self {
            Self::Null => ty.is_null(),
            Self::Boolean => ty.is_boolean(),
            Self::Numeric => ty.is_numeric(),
            Self::Integer => ty.is_exact_integer(),
            Self::ExactNumeric => ty.is_exact_numeric(),
            Self::ApproximateNumeric => ty.is_approximate(),
            Self::Decimal => ty.is_decimal(),
            Self::Character => ty.is_character(),
            Self::Binary => ty.is_binary(),
            Self::String => ty.is_string(),
            Self::Date => ty.is_date(),
            Self::Time => ty.is_time(),
            Self::Timestamp => ty.is_timestamp(),
            Self::Datetime => ty.is_datetime(),
            Self::IntervalYearMonth => ty.is_year_month_interval(),
            Self::IntervalDayTime => ty.is_interval() && !ty.is_year_month_interval(),
            Self::Array => matches!(ty.kind, TypeKind::Array { .. }),
            Self::Map => matches!(ty.kind, TypeKind::Map { .. }),
        }
    }
}

impl fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TypeDescriptor {
    /// The primary family of this descriptor; `None` for rows
    pub fn family(&self) -> Option<TypeFamily> {
        let family = match &self.kind {
            TypeKind::Null => TypeFamily::Null,
            TypeKind::Boolean => TypeFamily::Boolean,
            TypeKind::ExactNumeric { .. }
            | TypeKind::Decimal { .. }
            | TypeKind::ApproxNumeric { .. } => TypeFamily::Numeric,
            TypeKind::Character { .. } => TypeFamily::Character,
            TypeKind::Binary { .. } => TypeFamily::Binary,
            TypeKind::Date => TypeFamily::Date,
            TypeKind::Time => TypeFamily::Time,
            TypeKind::Timestamp { .. } => TypeFamily::Timestamp,
            TypeKind::Interval { start, .. } if start.is_year_month() => {
                TypeFamily::IntervalYearMonth
            }
            TypeKind::Interval { .. } => TypeFamily::IntervalDayTime,
            TypeKind::Array { .. } => TypeFamily::Array,
            TypeKind::Map { .. } => TypeFamily::Map,
            TypeKind::Row { .. } => return None,
        };
        Some(family)
    }

    /// Every family containing this descriptor, primary family first
    pub fn families(&self) -> SmallVec<[TypeFamily; 4]> {
        let Some(primary) = self.family() else {
            return SmallVec::new();
        };
        let mut out: SmallVec<[TypeFamily; 4]> = smallvec![primary];
        for family in TypeFamily::ALL {
            if family != primary && family.contains(self) {
                out.push(family);
            }
        }
        out
    }
}
