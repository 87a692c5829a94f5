//! Diagnostics and error handling for SQL type coercion
//!
//! This crate provides the error handling infrastructure shared by the
//! type system and the statement-level coercion policies: structured error
//! codes, diagnostics, and the top-level [`SqlError`].

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for coercion operations
pub type Result<T> = std::result::Result<T, SqlError>;
