//! Type factory
//!
//! The factory builds canonical descriptors (parameters validated and capped
//! to the configured limits) and owns the type-system-wide rules the
//! resolvers lean on:
//! - least restrictive type of a list of sibling types
//! - DECIMAL equivalents of exact and approximate numerics
//! - default descriptor of each family
//! - DECIMAL arithmetic result types

use crate::decimal::{self, PrecisionScale};
use crate::{
    ApproxKind, BinaryKind, CharKind, ConfigError, RowField, TimeUnit, TypeDescriptor,
    TypeFamily, TypeKind, TypeSystemConfig,
};
use serde::{Deserialize, Serialize};
use sqlcoerce_diagnostics::{ErrorBuilder, SQC0001, SQC0002, SQC0003, SQC0004, SQC0005, SqlError};
use thiserror::Error;

/// Type construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("DECIMAL precision must be at least 1, got {precision}")]
    InvalidPrecision { precision: u32 },

    #[error("DECIMAL scale {scale} exceeds precision {precision}")]
    ScaleExceedsPrecision { precision: u32, scale: u32 },

    #[error("Length {length} of {kind} must be between 1 and {max}")]
    InvalidLength { kind: String, length: u32, max: u32 },

    #[error("Invalid interval qualifier {start} TO {end}")]
    InvalidInterval { start: TimeUnit, end: TimeUnit },

    #[error("{kind} does not take a length")]
    NoLengthParameter { kind: String },
}

impl TypeError {
    /// Get the error code
    pub fn code(&self) -> sqlcoerce_diagnostics::ErrorCode {
        match self {
            Self::InvalidPrecision { .. } => SQC0001,
            Self::ScaleExceedsPrecision { .. } => SQC0002,
            Self::InvalidLength { .. } => SQC0003,
            Self::InvalidInterval { .. } => SQC0004,
            Self::NoLengthParameter { .. } => SQC0005,
        }
    }
}

impl From<TypeError> for SqlError {
    fn from(err: TypeError) -> Self {
        ErrorBuilder::new(err.code(), err.to_string()).type_error()
    }
}

/// Scalar type names, without parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Null,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Float,
    Double,
    Char,
    VarChar,
    Binary,
    VarBinary,
    Date,
    Time,
    Timestamp,
    TimestampWithLocalTimeZone,
}

impl ScalarKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Boolean => "BOOLEAN",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Decimal => "DECIMAL",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Char => "CHAR",
            Self::VarChar => "VARCHAR",
            Self::Binary => "BINARY",
            Self::VarBinary => "VARBINARY",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::TimestampWithLocalTimeZone => "TIMESTAMP_WITH_LOCAL_TIME_ZONE",
        }
    }
}

/// Builds descriptors and answers type-system-wide questions
///
/// Only [`TypeFactory::config`] is required; every other operation has a
/// default implementation driven by the configuration.
pub trait TypeFactory: Send + Sync {
    /// Limits and defaults of this type system
    fn config(&self) -> &TypeSystemConfig;

    // === Construction ===

    /// Create a NOT NULL scalar with default parameters
    ///
    /// DECIMAL gets the default precision and scale, CHAR and BINARY the
    /// default length, VARCHAR and VARBINARY are unbounded.
    fn create_scalar(&self, kind: ScalarKind) -> TypeDescriptor {
        let config = self.config();
        match kind {
            ScalarKind::Null => TypeDescriptor::null(),
            ScalarKind::Boolean => TypeDescriptor::boolean(),
            ScalarKind::TinyInt => TypeDescriptor::tinyint(),
            ScalarKind::SmallInt => TypeDescriptor::smallint(),
            ScalarKind::Integer => TypeDescriptor::integer(),
            ScalarKind::BigInt => TypeDescriptor::bigint(),
            ScalarKind::Decimal => self.default_decimal(),
            ScalarKind::Float => TypeDescriptor::float(),
            ScalarKind::Double => TypeDescriptor::double(),
            ScalarKind::Char => TypeDescriptor::char(config.default_char_length),
            ScalarKind::VarChar => TypeDescriptor::varchar(None),
            ScalarKind::Binary => TypeDescriptor::binary(config.default_binary_length),
            ScalarKind::VarBinary => TypeDescriptor::varbinary(None),
            ScalarKind::Date => TypeDescriptor::date(),
            ScalarKind::Time => TypeDescriptor::time(),
            ScalarKind::Timestamp => TypeDescriptor::timestamp(),
            ScalarKind::TimestampWithLocalTimeZone => TypeDescriptor::timestamp_with_local_time_zone(),
        }
    }

    /// Create a character or binary string type of the given length
    fn create_with_length(&self, kind: ScalarKind, length: u32) -> Result<TypeDescriptor, TypeError> {
        let config = self.config();
        let max = match kind {
            ScalarKind::Char | ScalarKind::VarChar => config.max_char_length,
            ScalarKind::Binary | ScalarKind::VarBinary => config.max_binary_length,
            other => {
                return Err(TypeError::NoLengthParameter {
                    kind: other.name().to_string(),
                });
            }
        };
        if length == 0 || length > max {
            return Err(TypeError::InvalidLength {
                kind: kind.name().to_string(),
                length,
                max,
            });
        }
        Ok(match kind {
            ScalarKind::Char => TypeDescriptor::char(length),
            ScalarKind::VarChar => TypeDescriptor::varchar(Some(length)),
            ScalarKind::Binary => TypeDescriptor::binary(length),
            _ => TypeDescriptor::varbinary(Some(length)),
        })
    }

    /// Create `DECIMAL(precision, scale)`, capped to the configured maxima
    fn create_decimal(&self, precision: u32, scale: u32) -> Result<TypeDescriptor, TypeError> {
        if precision == 0 {
            return Err(TypeError::InvalidPrecision { precision });
        }
        if scale > precision {
            return Err(TypeError::ScaleExceedsPrecision { precision, scale });
        }
        let config = self.config();
        let precision = precision.min(config.max_numeric_precision);
        let scale = scale.min(config.max_numeric_scale).min(precision);
        Ok(TypeDescriptor::decimal(precision, scale))
    }

    /// Create an interval type; units must be ordered and of one class
    fn create_interval(&self, start: TimeUnit, end: TimeUnit) -> Result<TypeDescriptor, TypeError> {
        if start > end || start.is_year_month() != end.is_year_month() {
            return Err(TypeError::InvalidInterval { start, end });
        }
        Ok(TypeDescriptor::interval(start, end))
    }

    fn create_array(&self, element: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::array(element)
    }

    fn create_map(&self, key: TypeDescriptor, value: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::map(key, value)
    }

    fn create_row(&self, fields: Vec<RowField>) -> TypeDescriptor {
        TypeDescriptor::row(fields)
    }

    // === Well-known types ===

    /// DECIMAL with the default precision and scale
    fn default_decimal(&self) -> TypeDescriptor {
        let config = self.config();
        TypeDescriptor::decimal(config.default_decimal_precision, config.default_decimal_scale)
    }

    /// DECIMAL with maximum precision and maximum scale, e.g. `DECIMAL(19, 19)`
    fn max_precision_scale_decimal(&self) -> TypeDescriptor {
        let config = self.config();
        TypeDescriptor::decimal(config.max_numeric_precision, config.max_decimal_scale())
    }

    /// The DECIMAL a numeric value can be represented as without losing digits
    ///
    /// Integer kinds map to `DECIMAL(digits, 0)`, approximate kinds to a
    /// fixed equivalent capped to the maximum precision, NULL to the default
    /// DECIMAL. Non-numeric types have no equivalent. The result keeps the
    /// source's nullability.
    fn decimal_equivalent_of(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        let config = self.config();
        let (precision, scale) = match &ty.kind {
            TypeKind::Decimal { .. } => return Some(ty.clone()),
            TypeKind::Null => return Some(self.default_decimal().with_nullable(true)),
            TypeKind::ExactNumeric { kind } => (kind.digits(), 0),
            TypeKind::ApproxNumeric { kind: ApproxKind::Float } => (14, 7),
            TypeKind::ApproxNumeric { kind: ApproxKind::Double } => (30, 15),
            _ => return None,
        };
        let precision = precision.min(config.max_numeric_precision);
        let scale = scale.min(config.max_numeric_scale).min(precision);
        Some(TypeDescriptor::decimal(precision, scale).with_nullable(ty.nullable))
    }

    /// The descriptor a NULL takes when cast into `family`
    fn default_for_family(&self, family: TypeFamily) -> TypeDescriptor {
        match family {
            TypeFamily::Null => TypeDescriptor::null(),
            TypeFamily::Boolean => TypeDescriptor::boolean(),
            TypeFamily::Numeric | TypeFamily::Integer | TypeFamily::ExactNumeric => {
                TypeDescriptor::integer()
            }
            TypeFamily::Decimal => self.default_decimal(),
            TypeFamily::ApproximateNumeric => TypeDescriptor::double(),
            TypeFamily::Character | TypeFamily::String => TypeDescriptor::varchar(None),
            TypeFamily::Binary => TypeDescriptor::varbinary(None),
            TypeFamily::Date => TypeDescriptor::date(),
            TypeFamily::Time => TypeDescriptor::time(),
            TypeFamily::Timestamp | TypeFamily::Datetime => TypeDescriptor::timestamp(),
            TypeFamily::IntervalYearMonth => TypeDescriptor::interval(TimeUnit::Year, TimeUnit::Month),
            TypeFamily::IntervalDayTime => TypeDescriptor::interval(TimeUnit::Day, TimeUnit::Second),
            TypeFamily::Array => TypeDescriptor::array(TypeDescriptor::null()),
            TypeFamily::Map => TypeDescriptor::map(TypeDescriptor::null(), TypeDescriptor::null()),
        }
    }

    // === Reconciliation ===

    /// The least restrictive type all of `types` can be converted to
    ///
    /// NULL entries only contribute nullability. Returns `None` for an empty
    /// list or when any two types are incompatible. The result is nullable
    /// if any input is.
    fn least_restrictive(&self, types: &[TypeDescriptor]) -> Option<TypeDescriptor> {
        if types.is_empty() {
            return None;
        }
        let nullable = types.iter().any(|t| t.nullable);
        let mut result: Option<TypeDescriptor> = None;
        for ty in types.iter().filter(|t| !t.is_null()) {
            result = Some(match result {
                None => ty.clone(),
                Some(acc) => least_restrictive_pair(self, &acc, ty)?,
            });
        }
        Some(match result {
            Some(ty) => ty.with_nullable(nullable),
            None => TypeDescriptor::null(),
        })
    }

    // === DECIMAL arithmetic ===

    /// Result type of `a + b` / `a - b` for exact numeric operands
    fn derive_sum_type(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> Option<TypeDescriptor> {
        derive_exact(self, a, b, decimal::sum)
    }

    /// Result type of `a * b` for exact numeric operands
    fn derive_product_type(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> Option<TypeDescriptor> {
        derive_exact(self, a, b, decimal::product)
    }

    /// Result type of `a / b` for exact numeric operands
    fn derive_quotient_type(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> Option<TypeDescriptor> {
        derive_exact(self, a, b, decimal::quotient)
    }

    /// Result type of `MOD(a, b)` for exact numeric operands
    ///
    /// Two integers yield the second operand's type.
    fn derive_modulus_type(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> Option<TypeDescriptor> {
        if a.is_exact_integer() && b.is_exact_integer() {
            return Some(b.with_nullable(a.nullable || b.nullable));
        }
        derive_exact(self, a, b, decimal::modulus)
    }
}

fn precision_scale(ty: &TypeDescriptor) -> Option<PrecisionScale> {
    if !ty.is_exact_numeric() {
        return None;
    }
    Some((ty.precision()?, ty.scale()?))
}

fn derive_exact<F: TypeFactory + ?Sized>(
    factory: &F,
    a: &TypeDescriptor,
    b: &TypeDescriptor,
    rule: fn(&TypeSystemConfig, PrecisionScale, PrecisionScale) -> PrecisionScale,
) -> Option<TypeDescriptor> {
    let (p, s) = rule(factory.config(), precision_scale(a)?, precision_scale(b)?);
    Some(TypeDescriptor::decimal(p, s).with_nullable(a.nullable || b.nullable))
}

fn merge_length(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        _ => None,
    }
}

/// Least restrictive type of two non-NULL types, ignoring outer nullability
fn least_restrictive_pair<F: TypeFactory + ?Sized>(
    factory: &F,
    a: &TypeDescriptor,
    b: &TypeDescriptor,
) -> Option<TypeDescriptor> {
    let config = factory.config();
    let kind = match (&a.kind, &b.kind) {
        (
            TypeKind::Character { kind: k1, length: l1 },
            TypeKind::Character { kind: k2, length: l2 },
        ) => TypeKind::Character {
            kind: if *k1 == CharKind::VarChar || *k2 == CharKind::VarChar {
                CharKind::VarChar
            } else {
                CharKind::Char
            },
            length: merge_length(*l1, *l2),
        },
        (
            TypeKind::Binary { kind: k1, length: l1 },
            TypeKind::Binary { kind: k2, length: l2 },
        ) => TypeKind::Binary {
            kind: if *k1 == BinaryKind::VarBinary || *k2 == BinaryKind::VarBinary {
                BinaryKind::VarBinary
            } else {
                BinaryKind::Binary
            },
            length: merge_length(*l1, *l2),
        },
        (TypeKind::ExactNumeric { kind: k1 }, TypeKind::ExactNumeric { kind: k2 }) => {
            TypeKind::ExactNumeric { kind: *k1.max(k2) }
        }
        (TypeKind::Decimal { .. }, TypeKind::Decimal { .. } | TypeKind::ExactNumeric { .. })
        | (TypeKind::ExactNumeric { .. }, TypeKind::Decimal { .. }) => {
            let (precision, scale) = decimal::widen(config, precision_scale(a)?, precision_scale(b)?);
            TypeKind::Decimal { precision, scale }
        }
        (TypeKind::ApproxNumeric { kind: k1 }, TypeKind::ApproxNumeric { kind: k2 }) => {
            // equal precision keeps the first operand
            if k2.precision() > k1.precision() {
                TypeKind::ApproxNumeric { kind: *k2 }
            } else {
                TypeKind::ApproxNumeric { kind: *k1 }
            }
        }
        (TypeKind::ApproxNumeric { .. }, TypeKind::ExactNumeric { .. }) => a.kind.clone(),
        (TypeKind::ExactNumeric { .. }, TypeKind::ApproxNumeric { .. }) => b.kind.clone(),
        (TypeKind::ApproxNumeric { .. }, TypeKind::Decimal { .. })
        | (TypeKind::Decimal { .. }, TypeKind::ApproxNumeric { .. }) => TypeKind::ApproxNumeric {
            kind: ApproxKind::Double,
        },
        (TypeKind::Boolean, TypeKind::Boolean)
        | (TypeKind::Date, TypeKind::Date)
        | (TypeKind::Time, TypeKind::Time) => a.kind.clone(),
        (TypeKind::Timestamp { with_local_tz: t1 }, TypeKind::Timestamp { with_local_tz: t2 })
            if t1 == t2 =>
        {
            a.kind.clone()
        }
        (TypeKind::Interval { start: s1, end: e1 }, TypeKind::Interval { start: s2, end: e2 })
            if s1.is_year_month() == s2.is_year_month() =>
        {
            TypeKind::Interval {
                start: *s1.min(s2),
                end: *e1.max(e2),
            }
        }
        (TypeKind::Array { element: e1 }, TypeKind::Array { element: e2 }) => TypeKind::Array {
            element: Box::new(factory.least_restrictive(&[(**e1).clone(), (**e2).clone()])?),
        },
        (TypeKind::Map { key: k1, value: v1 }, TypeKind::Map { key: k2, value: v2 }) => TypeKind::Map {
            key: Box::new(factory.least_restrictive(&[(**k1).clone(), (**k2).clone()])?),
            value: Box::new(factory.least_restrictive(&[(**v1).clone(), (**v2).clone()])?),
        },
        (TypeKind::Row { fields: f1 }, TypeKind::Row { fields: f2 }) => {
            if f1.len() != f2.len() || f1.iter().zip(f2).any(|(x, y)| x.name != y.name) {
                return None;
            }
            let fields = f1
                .iter()
                .zip(f2)
                .map(|(x, y)| {
                    factory
                        .least_restrictive(&[x.field_type.clone(), y.field_type.clone()])
                        .map(|t| RowField::new(x.name.clone(), t))
                })
                .collect::<Option<Vec<_>>>()?;
            TypeKind::Row { fields }
        }
        _ => return None,
    };
    Some(TypeDescriptor {
        kind,
        nullable: a.nullable || b.nullable,
    })
}

/// Default type factory, parameterized by a [`TypeSystemConfig`]
#[derive(Debug, Clone, Default)]
pub struct SqlTypeFactory {
    config: TypeSystemConfig,
}

impl SqlTypeFactory {
    /// Create a factory from a validated configuration
    pub fn new(config: TypeSystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl TypeFactory for SqlTypeFactory {
    fn config(&self) -> &TypeSystemConfig {
        &self.config
    }
}
