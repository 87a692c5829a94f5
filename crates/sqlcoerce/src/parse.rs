//! Type name parser
//!
//! Reads the rendering produced by [`TypeDescriptor::full_type_string`] back
//! into descriptors. Parsing runs in two steps: a grammar producing an
//! unresolved [`TypeSpec`], then resolution through a [`TypeFactory`] so the
//! factory's limits and canonicalization apply.
//!
//! A type without a nullability suffix is nullable, as in a SQL column
//! declaration. Keywords are case-insensitive.

use chumsky::prelude::*;
use sqlcoerce_diagnostics::{ErrorBuilder, ErrorCode, SQC0300, SQC0301, SqlError};
use sqlcoerce_types::{RowField, ScalarKind, TimeUnit, TypeDescriptor, TypeError, TypeFactory, TypeFamily};
use thiserror::Error;

type Extra<'a> = extra::Err<Rich<'a, char>>;

/// Type and family name errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed type name: {message}")]
    Syntax { message: String },

    #[error("{kind} does not accept parameters ({params})")]
    UnexpectedParameters { kind: String, params: String },

    #[error("The NULL type cannot be declared NOT NULL")]
    NotNullNull,

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("Unknown type family '{name}'")]
    UnknownFamily { name: String },
}

impl ParseError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Type(err) => err.code(),
            Self::UnknownFamily { .. } => SQC0301,
            Self::Syntax { .. } | Self::UnexpectedParameters { .. } | Self::NotNullNull => SQC0300,
        }
    }
}

impl From<ParseError> for SqlError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Type(err) => err.into(),
            other => ErrorBuilder::new(other.code(), other.to_string()).parse(),
        }
    }
}

/// A parsed, not yet validated type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub kind: SpecKind,
    /// `None` when the name carries no nullability suffix
    pub nullable: Option<bool>,
}

/// Shape of a parsed type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecKind {
    /// Scalar name with its parenthesized parameters, if any
    Scalar { kind: ScalarKind, params: Vec<u32> },
    /// `INTERVAL start [TO end]`
    Interval { start: TimeUnit, end: Option<TimeUnit> },
    Array(Box<TypeSpec>),
    Map(Box<TypeSpec>, Box<TypeSpec>),
    Row(Vec<(String, TypeSpec)>),
}

impl TypeSpec {
    /// Build the canonical descriptor through `factory`
    pub fn resolve<F: TypeFactory>(&self, factory: &F) -> Result<TypeDescriptor, ParseError> {
        let ty = match &self.kind {
            SpecKind::Scalar { kind, params } => resolve_scalar(factory, *kind, params)?,
            SpecKind::Interval { start, end } => factory.create_interval(*start, end.unwrap_or(*start))?,
            SpecKind::Array(element) => factory.create_array(element.resolve(factory)?),
            SpecKind::Map(key, value) => factory.create_map(key.resolve(factory)?, value.resolve(factory)?),
            SpecKind::Row(fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, spec)| Ok(RowField::new(name.clone(), spec.resolve(factory)?)))
                    .collect::<Result<Vec<_>, ParseError>>()?;
                factory.create_row(fields)
            }
        };
        match self.nullable {
            Some(false) if ty.is_null() => Err(ParseError::NotNullNull),
            nullable => Ok(ty.with_nullable(nullable.unwrap_or(true))),
        }
    }
}

fn resolve_scalar<F: TypeFactory>(
    factory: &F,
    kind: ScalarKind,
    params: &[u32],
) -> Result<TypeDescriptor, ParseError> {
    match (kind, params) {
        (_, []) => Ok(factory.create_scalar(kind)),
        (ScalarKind::Decimal, [precision]) => Ok(factory.create_decimal(*precision, 0)?),
        (ScalarKind::Decimal, [precision, scale]) => Ok(factory.create_decimal(*precision, *scale)?),
        (ScalarKind::Char | ScalarKind::VarChar | ScalarKind::Binary | ScalarKind::VarBinary, [length]) => {
            Ok(factory.create_with_length(kind, *length)?)
        }
        // only second precision 0 is modelled
        (ScalarKind::Time | ScalarKind::Timestamp | ScalarKind::TimestampWithLocalTimeZone, [0]) => {
            Ok(factory.create_scalar(kind))
        }
        _ => Err(ParseError::UnexpectedParameters {
            kind: kind.name().to_string(),
            params: params.iter().map(u32::to_string).collect::<Vec<_>>().join(", "),
        }),
    }
}

fn scalar_kind(name: &str) -> Option<ScalarKind> {
    let kind = match name.to_ascii_uppercase().as_str() {
        "NULL" => ScalarKind::Null,
        "BOOLEAN" => ScalarKind::Boolean,
        "TINYINT" => ScalarKind::TinyInt,
        "SMALLINT" => ScalarKind::SmallInt,
        "INTEGER" | "INT" => ScalarKind::Integer,
        "BIGINT" => ScalarKind::BigInt,
        "DECIMAL" => ScalarKind::Decimal,
        "FLOAT" => ScalarKind::Float,
        "DOUBLE" => ScalarKind::Double,
        "CHAR" => ScalarKind::Char,
        "VARCHAR" => ScalarKind::VarChar,
        "BINARY" => ScalarKind::Binary,
        "VARBINARY" => ScalarKind::VarBinary,
        "DATE" => ScalarKind::Date,
        "TIME" => ScalarKind::Time,
        "TIMESTAMP" => ScalarKind::Timestamp,
        "TIMESTAMP_WITH_LOCAL_TIME_ZONE" => ScalarKind::TimestampWithLocalTimeZone,
        _ => return None,
    };
    Some(kind)
}

fn time_unit(name: &str) -> Option<TimeUnit> {
    let unit = match name.to_ascii_uppercase().as_str() {
        "YEAR" => TimeUnit::Year,
        "MONTH" => TimeUnit::Month,
        "DAY" => TimeUnit::Day,
        "HOUR" => TimeUnit::Hour,
        "MINUTE" => TimeUnit::Minute,
        "SECOND" => TimeUnit::Second,
        _ => return None,
    };
    Some(unit)
}

/// Parse a case-insensitive keyword
fn keyword<'a>(word: &'static str) -> impl Parser<'a, &'a str, (), Extra<'a>> + Clone {
    text::ident()
        .try_map(move |ident: &str, span| {
            if ident.eq_ignore_ascii_case(word) {
                Ok(())
            } else {
                Err(Rich::custom(span, format!("expected {}", word)))
            }
        })
        .padded()
}

/// Parse a ROW field name; `$` may appear after the first character, as in
/// the generated `EXPR$0`
fn field_name<'a>() -> impl Parser<'a, &'a str, String, Extra<'a>> + Clone {
    any()
        .filter(|c: &char| c.is_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_alphanumeric() || *c == '_' || *c == '$')
                .repeated(),
        )
        .to_slice()
        .map(str::to_string)
        .padded()
}

/// Parse an optional `NOT NULL` or `NULL` suffix into the nullable flag
fn nullability<'a>() -> impl Parser<'a, &'a str, Option<bool>, Extra<'a>> + Clone {
    choice((
        keyword("NOT").ignore_then(keyword("NULL")).to(false),
        keyword("NULL").to(true),
    ))
    .or_not()
}

/// Parse a parenthesized, comma-separated list of unsigned integers
fn parameters<'a>() -> impl Parser<'a, &'a str, Vec<u32>, Extra<'a>> + Clone {
    text::int(10)
        .try_map(|digits: &str, span| {
            digits
                .parse::<u32>()
                .map_err(|e| Rich::custom(span, format!("invalid parameter {}: {}", digits, e)))
        })
        .padded()
        .separated_by(just(',').padded())
        .at_least(1)
        .collect::<Vec<u32>>()
        .delimited_by(just('(').padded(), just(')').padded())
}

/// Parse a type name
pub fn type_spec_parser<'a>() -> impl Parser<'a, &'a str, TypeSpec, Extra<'a>> + Clone {
    recursive(|ty| {
        let scalar = text::ident()
            .try_map(|name: &str, span| {
                scalar_kind(name).ok_or_else(|| Rich::custom(span, format!("unknown type '{}'", name)))
            })
            .padded()
            .then(parameters().or_not())
            .map(|(kind, params)| SpecKind::Scalar {
                kind,
                params: params.unwrap_or_default(),
            });

        let unit = text::ident()
            .try_map(|name: &str, span| {
                time_unit(name).ok_or_else(|| Rich::custom(span, format!("unknown time unit '{}'", name)))
            })
            .padded();
        let interval = keyword("INTERVAL")
            .ignore_then(unit)
            .then(keyword("TO").ignore_then(unit).or_not())
            .map(|(start, end)| SpecKind::Interval { start, end });

        let field = field_name().then(ty.clone());
        let row = keyword("ROW")
            .ignore_then(
                field
                    .separated_by(just(',').padded())
                    .collect::<Vec<_>>()
                    .delimited_by(just('(').padded(), just(')').padded()),
            )
            .map(SpecKind::Row);

        let map = ty
            .clone()
            .then_ignore(just(',').padded())
            .then(ty)
            .delimited_by(just('(').padded(), just(')').padded())
            .then_ignore(keyword("MAP"))
            .map(|(key, value)| SpecKind::Map(Box::new(key), Box::new(value)));

        let primary = choice((interval, row, map, scalar))
            .then(nullability())
            .map(|(kind, nullable)| TypeSpec { kind, nullable });

        primary
            .then(keyword("ARRAY").ignore_then(nullability()).repeated().collect::<Vec<_>>())
            .map(|(element, arrays)| {
                arrays.into_iter().fold(element, |element, nullable| TypeSpec {
                    kind: SpecKind::Array(Box::new(element)),
                    nullable,
                })
            })
    })
}

/// Parse a type name without resolving it
pub fn parse_type_spec(input: &str) -> Result<TypeSpec, ParseError> {
    type_spec_parser()
        .then_ignore(end())
        .parse(input)
        .into_result()
        .map_err(|errors| ParseError::Syntax {
            message: errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "),
        })
}

/// Parse a type name into a canonical descriptor
pub fn parse_type<F: TypeFactory>(input: &str, factory: &F) -> Result<TypeDescriptor, ParseError> {
    parse_type_spec(input)?.resolve(factory)
}

/// Parse a family name such as `EXACT_NUMERIC`
pub fn parse_family(input: &str) -> Result<TypeFamily, ParseError> {
    let name = input.trim();
    TypeFamily::ALL
        .into_iter()
        .find(|family| family.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| ParseError::UnknownFamily {
            name: name.to_string(),
        })
}
