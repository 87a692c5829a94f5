//! SQL Type Descriptors
//!
//! This module defines the type descriptor model consumed by the coercion
//! engine:
//! - `TypeKind`, the tagged union of scalar and composite kinds
//! - `TypeDescriptor`, a kind plus its nullability
//! - Scalar sub-kinds (`IntegerKind`, `ApproxKind`, ...) and interval units
//! - Canonical rendering used by diagnostics
//!
//! Descriptors are plain immutable values. Constructors here do not validate
//! parameters; use a [`crate::TypeFactory`] to build canonical descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exact integer kinds, ordered from narrowest to widest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntegerKind {
    TinyInt,
    SmallInt,
    Int,
    BigInt,
}

impl IntegerKind {
    /// Number of decimal digits needed to hold every value of the kind
    pub const fn digits(&self) -> u32 {
        match self {
            Self::TinyInt => 3,
            Self::SmallInt => 5,
            Self::Int => 10,
            Self::BigInt => 19,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Int => "INTEGER",
            Self::BigInt => "BIGINT",
        }
    }
}

/// Approximate numeric kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApproxKind {
    Float,
    Double,
}

impl ApproxKind {
    /// Binary precision reported by the type system.
    ///
    /// FLOAT and DOUBLE share a precision, which is what makes widening
    /// between them depend on operand order.
    pub const fn precision(&self) -> u32 {
        match self {
            Self::Float | Self::Double => 15,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
        }
    }
}

/// Character string kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharKind {
    Char,
    VarChar,
}

/// Binary string kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryKind {
    Binary,
    VarBinary,
}

/// Interval qualifier units, ordered from most to least significant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    /// Whether the unit belongs to the year-month interval class
    pub const fn is_year_month(&self) -> bool {
        matches!(self, Self::Year | Self::Month)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of a type descriptor, without nullability
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TypeKind {
    // === Special ===
    /// Type of the untyped NULL literal
    Null,
    Boolean,

    // === Numeric ===
    ExactNumeric { kind: IntegerKind },
    Decimal { precision: u32, scale: u32 },
    ApproxNumeric { kind: ApproxKind },

    // === Strings ===
    /// `length` is `None` for unbounded variable-length strings
    Character { kind: CharKind, length: Option<u32> },
    Binary { kind: BinaryKind, length: Option<u32> },

    // === Datetime ===
    Date,
    Time,
    Timestamp { with_local_tz: bool },
    Interval { start: TimeUnit, end: TimeUnit },

    // === Composite ===
    Array { element: Box<TypeDescriptor> },
    Map { key: Box<TypeDescriptor>, value: Box<TypeDescriptor> },
    Row { fields: Vec<RowField> },
}

/// A named field of a row type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowField {
    /// Field name
    pub name: String,
    /// Field type
    pub field_type: TypeDescriptor,
}

impl RowField {
    /// Create a new row field
    pub fn new(name: impl Into<String>, field_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// A SQL type: a kind plus a nullability flag
///
/// Two descriptors are equal when kind, parameters, nullability and (for
/// composites) every child are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub kind: TypeKind,
    pub nullable: bool,
}

impl TypeDescriptor {
    // === Constructors ===

    /// Create a NOT NULL descriptor of the given kind
    pub fn new(kind: TypeKind) -> Self {
        let nullable = matches!(kind, TypeKind::Null);
        Self { kind, nullable }
    }

    /// The NULL type, which is always nullable
    pub fn null() -> Self {
        Self::new(TypeKind::Null)
    }

    pub fn boolean() -> Self {
        Self::new(TypeKind::Boolean)
    }

    pub fn integer_kind(kind: IntegerKind) -> Self {
        Self::new(TypeKind::ExactNumeric { kind })
    }

    pub fn tinyint() -> Self {
        Self::integer_kind(IntegerKind::TinyInt)
    }

    pub fn smallint() -> Self {
        Self::integer_kind(IntegerKind::SmallInt)
    }

    pub fn integer() -> Self {
        Self::integer_kind(IntegerKind::Int)
    }

    pub fn bigint() -> Self {
        Self::integer_kind(IntegerKind::BigInt)
    }

    pub fn decimal(precision: u32, scale: u32) -> Self {
        Self::new(TypeKind::Decimal { precision, scale })
    }

    pub fn approx_kind(kind: ApproxKind) -> Self {
        Self::new(TypeKind::ApproxNumeric { kind })
    }

    pub fn float() -> Self {
        Self::approx_kind(ApproxKind::Float)
    }

    pub fn double() -> Self {
        Self::approx_kind(ApproxKind::Double)
    }

    pub fn char(length: u32) -> Self {
        Self::new(TypeKind::Character {
            kind: CharKind::Char,
            length: Some(length),
        })
    }

    pub fn varchar(length: Option<u32>) -> Self {
        Self::new(TypeKind::Character {
            kind: CharKind::VarChar,
            length,
        })
    }

    pub fn binary(length: u32) -> Self {
        Self::new(TypeKind::Binary {
            kind: BinaryKind::Binary,
            length: Some(length),
        })
    }

    pub fn varbinary(length: Option<u32>) -> Self {
        Self::new(TypeKind::Binary {
            kind: BinaryKind::VarBinary,
            length,
        })
    }

    pub fn date() -> Self {
        Self::new(TypeKind::Date)
    }

    pub fn time() -> Self {
        Self::new(TypeKind::Time)
    }

    pub fn timestamp() -> Self {
        Self::new(TypeKind::Timestamp { with_local_tz: false })
    }

    pub fn timestamp_with_local_time_zone() -> Self {
        Self::new(TypeKind::Timestamp { with_local_tz: true })
    }

    pub fn interval(start: TimeUnit, end: TimeUnit) -> Self {
        Self::new(TypeKind::Interval { start, end })
    }

    /// Create an array type
    pub fn array(element: TypeDescriptor) -> Self {
        Self::new(TypeKind::Array {
            element: Box::new(element),
        })
    }

    /// Create a map type
    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::new(TypeKind::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    /// Create a row type
    pub fn row(fields: Vec<RowField>) -> Self {
        Self::new(TypeKind::Row { fields })
    }

    /// Return a copy with the given nullability
    ///
    /// The NULL type stays nullable.
    pub fn with_nullable(&self, nullable: bool) -> Self {
        Self {
            kind: self.kind.clone(),
            nullable: nullable || self.is_null(),
        }
    }

    // === Predicates ===

    pub fn is_null(&self) -> bool {
        matches!(self.kind, TypeKind::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.kind, TypeKind::Boolean)
    }

    /// Exact integer kinds (TINYINT through BIGINT)
    pub fn is_exact_integer(&self) -> bool {
        matches!(self.kind, TypeKind::ExactNumeric { .. })
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self.kind, TypeKind::Decimal { .. })
    }

    /// Integer kinds and DECIMAL
    pub fn is_exact_numeric(&self) -> bool {
        self.is_exact_integer() || self.is_decimal()
    }

    pub fn is_approximate(&self) -> bool {
        matches!(self.kind, TypeKind::ApproxNumeric { .. })
    }

    pub fn is_numeric(&self) -> bool {
        self.is_exact_numeric() || self.is_approximate()
    }

    pub fn is_character(&self) -> bool {
        matches!(self.kind, TypeKind::Character { .. })
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.kind, TypeKind::Binary { .. })
    }

    /// Character or binary strings
    pub fn is_string(&self) -> bool {
        self.is_character() || self.is_binary()
    }

    pub fn is_date(&self) -> bool {
        matches!(self.kind, TypeKind::Date)
    }

    pub fn is_time(&self) -> bool {
        matches!(self.kind, TypeKind::Time)
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self.kind, TypeKind::Timestamp { .. })
    }

    /// DATE, TIME and both TIMESTAMP kinds
    pub fn is_datetime(&self) -> bool {
        self.is_date() || self.is_time() || self.is_timestamp()
    }

    pub fn is_interval(&self) -> bool {
        matches!(self.kind, TypeKind::Interval { .. })
    }

    pub fn is_year_month_interval(&self) -> bool {
        matches!(self.kind, TypeKind::Interval { start, .. } if start.is_year_month())
    }

    /// Scalar kinds that may be promoted to a character string
    pub fn is_atomic(&self) -> bool {
        self.is_numeric() || self.is_datetime() || self.is_string() || self.is_boolean()
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Array { .. } | TypeKind::Map { .. } | TypeKind::Row { .. }
        )
    }

    // === Accessors ===

    /// Precision of a DECIMAL or integer kind, in decimal digits
    pub fn precision(&self) -> Option<u32> {
        match &self.kind {
            TypeKind::Decimal { precision, .. } => Some(*precision),
            TypeKind::ExactNumeric { kind } => Some(kind.digits()),
            TypeKind::ApproxNumeric { kind } => Some(kind.precision()),
            _ => None,
        }
    }

    /// Scale of a DECIMAL or integer kind
    pub fn scale(&self) -> Option<u32> {
        match &self.kind {
            TypeKind::Decimal { scale, .. } => Some(*scale),
            TypeKind::ExactNumeric { .. } => Some(0),
            _ => None,
        }
    }

    /// Length of a character or binary string; `None` when unbounded or not a string
    pub fn length(&self) -> Option<u32> {
        match &self.kind {
            TypeKind::Character { length, .. } | TypeKind::Binary { length, .. } => *length,
            _ => None,
        }
    }

    /// Whether the type is a fixed-length CHAR or BINARY
    pub fn is_fixed_length(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Character { kind: CharKind::Char, .. }
                | TypeKind::Binary { kind: BinaryKind::Binary, .. }
        )
    }

    pub fn element_type(&self) -> Option<&TypeDescriptor> {
        match &self.kind {
            TypeKind::Array { element } => Some(element),
            _ => None,
        }
    }

    pub fn key_type(&self) -> Option<&TypeDescriptor> {
        match &self.kind {
            TypeKind::Map { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn value_type(&self) -> Option<&TypeDescriptor> {
        match &self.kind {
            TypeKind::Map { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn row_fields(&self) -> Option<&[RowField]> {
        match &self.kind {
            TypeKind::Row { fields } => Some(fields),
            _ => None,
        }
    }

    /// Compare two descriptors ignoring only the outer nullability flag
    pub fn equals_sans_nullability(&self, other: &TypeDescriptor) -> bool {
        self.kind == other.kind
    }

    // === Rendering ===

    /// SQL type name without the outer NOT NULL suffix, e.g. `DECIMAL(5, 2)`
    pub fn type_name(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, false);
        out
    }

    /// SQL type name including nullability, e.g. `INTEGER NOT NULL ARRAY NOT NULL`
    pub fn full_type_string(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, true);
        if !self.nullable {
            out.push_str(" NOT NULL");
        }
        out
    }

    fn render(&self, out: &mut String, with_detail: bool) {
        let child = |t: &TypeDescriptor| {
            if with_detail {
                t.full_type_string()
            } else {
                t.type_name()
            }
        };
        match &self.kind {
            TypeKind::Null => out.push_str("NULL"),
            TypeKind::Boolean => out.push_str("BOOLEAN"),
            TypeKind::ExactNumeric { kind } => out.push_str(kind.name()),
            TypeKind::Decimal { precision, scale } => {
                out.push_str(&format!("DECIMAL({}, {})", precision, scale));
            }
            TypeKind::ApproxNumeric { kind } => out.push_str(kind.name()),
            TypeKind::Character { kind, length } => {
                let name = match kind {
                    CharKind::Char => "CHAR",
                    CharKind::VarChar => "VARCHAR",
                };
                push_with_length(out, name, *length);
            }
            TypeKind::Binary { kind, length } => {
                let name = match kind {
                    BinaryKind::Binary => "BINARY",
                    BinaryKind::VarBinary => "VARBINARY",
                };
                push_with_length(out, name, *length);
            }
            TypeKind::Date => out.push_str("DATE"),
            TypeKind::Time => out.push_str("TIME(0)"),
            TypeKind::Timestamp { with_local_tz: false } => out.push_str("TIMESTAMP(0)"),
            TypeKind::Timestamp { with_local_tz: true } => {
                out.push_str("TIMESTAMP_WITH_LOCAL_TIME_ZONE(0)");
            }
            TypeKind::Interval { start, end } => {
                if start == end {
                    out.push_str(&format!("INTERVAL {}", start));
                } else {
                    out.push_str(&format!("INTERVAL {} TO {}", start, end));
                }
            }
            TypeKind::Array { element } => {
                out.push_str(&format!("{} ARRAY", child(element)));
            }
            TypeKind::Map { key, value } => {
                out.push_str(&format!("({}, {}) MAP", child(key), child(value)));
            }
            TypeKind::Row { fields } => {
                let rendered: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{} {}", f.name, f.field_type.full_type_string()))
                    .collect();
                out.push_str(&format!("ROW({})", rendered.join(", ")));
            }
        }
    }
}

fn push_with_length(out: &mut String, name: &str, length: Option<u32>) {
    match length {
        Some(n) => out.push_str(&format!("{}({})", name, n)),
        None => out.push_str(name),
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_type_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_predicates() {
        assert!(TypeDescriptor::null().is_null());
        assert!(TypeDescriptor::null().nullable);
        assert!(TypeDescriptor::integer().is_numeric());
        assert!(TypeDescriptor::integer().is_exact_integer());
        assert!(TypeDescriptor::decimal(5, 2).is_exact_numeric());
        assert!(!TypeDescriptor::decimal(5, 2).is_exact_integer());
        assert!(TypeDescriptor::float().is_approximate());
        assert!(TypeDescriptor::char(3).is_fixed_length());
        assert!(!TypeDescriptor::varchar(Some(3)).is_fixed_length());
        assert!(TypeDescriptor::timestamp_with_local_time_zone().is_datetime());
        assert!(TypeDescriptor::interval(TimeUnit::Year, TimeUnit::Month).is_year_month_interval());
        assert!(!TypeDescriptor::interval(TimeUnit::Day, TimeUnit::Second).is_atomic());
        assert!(TypeDescriptor::array(TypeDescriptor::integer()).is_composite());
    }

    #[test]
    fn test_integer_kind_ordering() {
        assert!(IntegerKind::TinyInt < IntegerKind::SmallInt);
        assert!(IntegerKind::Int < IntegerKind::BigInt);
        assert_eq!(IntegerKind::BigInt.digits(), 19);
    }

    #[test]
    fn test_equals_sans_nullability() {
        let a = TypeDescriptor::integer();
        let b = TypeDescriptor::integer().with_nullable(true);
        assert_ne!(a, b);
        assert!(a.equals_sans_nullability(&b));

        // only the outer flag is ignored
        let arr_a = TypeDescriptor::array(a.clone());
        let arr_b = TypeDescriptor::array(b.clone());
        assert!(!arr_a.equals_sans_nullability(&arr_b));
    }

    #[test]
    fn test_null_stays_nullable() {
        assert!(TypeDescriptor::null().with_nullable(false).nullable);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(TypeDescriptor::decimal(5, 2).type_name(), "DECIMAL(5, 2)");
        assert_eq!(TypeDescriptor::varchar(None).type_name(), "VARCHAR");
        assert_eq!(TypeDescriptor::varchar(Some(20)).type_name(), "VARCHAR(20)");
        assert_eq!(TypeDescriptor::binary(1).type_name(), "BINARY(1)");
        assert_eq!(TypeDescriptor::time().type_name(), "TIME(0)");
        assert_eq!(
            TypeDescriptor::interval(TimeUnit::Day, TimeUnit::Minute).type_name(),
            "INTERVAL DAY TO MINUTE"
        );
        assert_eq!(
            TypeDescriptor::interval(TimeUnit::Year, TimeUnit::Year).type_name(),
            "INTERVAL YEAR"
        );
    }

    #[test]
    fn test_full_type_string() {
        assert_eq!(TypeDescriptor::integer().full_type_string(), "INTEGER NOT NULL");
        assert_eq!(TypeDescriptor::null().full_type_string(), "NULL");
        assert_eq!(
            TypeDescriptor::array(TypeDescriptor::integer()).full_type_string(),
            "INTEGER NOT NULL ARRAY NOT NULL"
        );
        assert_eq!(
            TypeDescriptor::array(TypeDescriptor::integer()).type_name(),
            "INTEGER ARRAY"
        );
        assert_eq!(
            TypeDescriptor::row(vec![RowField::new("a1", TypeDescriptor::varchar(None))]).to_string(),
            "ROW(a1 VARCHAR NOT NULL) NOT NULL"
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let ty = TypeDescriptor::map(TypeDescriptor::varchar(None), TypeDescriptor::decimal(10, 2))
            .with_nullable(true);
        let json = serde_json::to_string(&ty).unwrap();
        let back: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, back);
    }
}
