//! Implicit SQL type coercion
//!
//! This crate bundles the coercion engine:
//! - The type model, type factory and resolvers ([`types`])
//! - Statement call sites: set operations, operators, INSERT and UPDATE
//!   ([`validate`])
//! - Error codes and diagnostics ([`diagnostics`])
//! - A parser for rendered type names ([`parse`])
//!
//! # Example
//!
//! ```
//! use sqlcoerce::{SqlTypeFactory, StatementCoercer, parse_type};
//! use sqlcoerce::validate::SetOperator;
//!
//! let factory = SqlTypeFactory::default();
//! let left = parse_type("ROW(a INTEGER NOT NULL) NOT NULL", &factory).unwrap();
//! let right = parse_type("ROW(b VARCHAR(5) NOT NULL) NOT NULL", &factory).unwrap();
//!
//! let union = StatementCoercer::new()
//!     .set_operation(SetOperator::Union, &[left, right])
//!     .unwrap();
//! assert_eq!(union.row_type.full_type_string(), "ROW(a VARCHAR NOT NULL) NOT NULL");
//! ```

// Re-export all public APIs from internal crates
pub use sqlcoerce_diagnostics as diagnostics;
pub use sqlcoerce_types as types;
pub use sqlcoerce_validate as validate;

pub mod parse;

// Convenience re-exports
pub use parse::{ParseError, parse_family, parse_type};
pub use sqlcoerce_diagnostics::{Diagnostic, Result, SqlError};
pub use sqlcoerce_types::{SqlTypeFactory, TypeCoercer, TypeDescriptor, TypeFactory, TypeFamily, TypeSystemConfig};
pub use sqlcoerce_validate::{CoercionError, ImplicitCast, StatementCoercer};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
