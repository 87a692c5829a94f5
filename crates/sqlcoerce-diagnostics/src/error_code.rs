//! Coercion error codes following a structured numbering system
//!
//! Error code ranges:
//! - SQC0001-SQC0099: Type construction errors (invalid parameters)
//! - SQC0100-SQC0199: Coercion errors (incompatible types, illegal casts)
//! - SQC0200-SQC0299: Statement shape errors (arity, unknown columns)
//! - SQC0300-SQC0399: Type name parse errors
//! - SQC0400-SQC0499: Configuration errors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a type construction error (0001-0099)
    pub const fn is_type_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a coercion error (0100-0199)
    pub const fn is_coercion_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a statement shape error (0200-0299)
    pub const fn is_statement_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a type name parse error (0300-0399)
    pub const fn is_parse_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Check if this is a configuration error (0400-0499)
    pub const fn is_config_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQC{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Type construction errors (0001-0099)
    map.insert(1, ErrorInfo::new("Invalid decimal precision"));
    map.insert(2, ErrorInfo::new("Decimal scale exceeds precision"));
    map.insert(3, ErrorInfo::new("Invalid length"));
    map.insert(4, ErrorInfo::new("Invalid interval qualifier")
        .with_help("Year-month and day-time units cannot be mixed"));
    map.insert(5, ErrorInfo::new("Type does not take a length"));

    // Coercion errors (0100-0199)
    map.insert(100, ErrorInfo::new("Incompatible types"));
    map.insert(101, ErrorInfo::new("Illegal implicit cast")
        .with_help("Add an explicit CAST to the required type"));
    map.insert(102, ErrorInfo::new("Incompatible operand types"));
    map.insert(103, ErrorInfo::new("Incompatible set operation column"));
    map.insert(104, ErrorInfo::new("Column not assignable")
        .with_help("The source expression cannot be implicitly cast to the column type"));
    map.insert(105, ErrorInfo::new("Cannot concatenate character and binary values"));
    map.insert(106, ErrorInfo::new("Invalid concatenation operand"));

    // Statement shape errors (0200-0299)
    map.insert(200, ErrorInfo::new("Set operation arity mismatch"));
    map.insert(201, ErrorInfo::new("Set operation branch is not a row type"));
    map.insert(202, ErrorInfo::new("Column count mismatch"));
    map.insert(203, ErrorInfo::new("Unknown target column"));
    map.insert(204, ErrorInfo::new("Column has no default value and does not allow NULLs")
        .with_help("List the column in the INSERT or declare a default"));
    map.insert(205, ErrorInfo::new("Duplicate target column"));

    // Type name parse errors (0300-0399)
    map.insert(300, ErrorInfo::new("Malformed type name")
        .with_help("Write types as they are rendered, e.g. DECIMAL(10, 2) NOT NULL or INTEGER ARRAY"));
    map.insert(301, ErrorInfo::new("Unknown type family"));

    // Configuration errors (0400-0499)
    map.insert(400, ErrorInfo::new("Invalid configuration"));
    map.insert(401, ErrorInfo::new("Configuration parse error"));

    map
});

// Type construction errors
pub const SQC0001: ErrorCode = ErrorCode::new(1);
pub const SQC0002: ErrorCode = ErrorCode::new(2);
pub const SQC0003: ErrorCode = ErrorCode::new(3);
pub const SQC0004: ErrorCode = ErrorCode::new(4);
pub const SQC0005: ErrorCode = ErrorCode::new(5);

// Coercion errors
pub const SQC0100: ErrorCode = ErrorCode::new(100);
pub const SQC0101: ErrorCode = ErrorCode::new(101);
pub const SQC0102: ErrorCode = ErrorCode::new(102);
pub const SQC0103: ErrorCode = ErrorCode::new(103);
pub const SQC0104: ErrorCode = ErrorCode::new(104);
pub const SQC0105: ErrorCode = ErrorCode::new(105);
pub const SQC0106: ErrorCode = ErrorCode::new(106);

// Statement shape errors
pub const SQC0200: ErrorCode = ErrorCode::new(200);
pub const SQC0201: ErrorCode = ErrorCode::new(201);
pub const SQC0202: ErrorCode = ErrorCode::new(202);
pub const SQC0203: ErrorCode = ErrorCode::new(203);
pub const SQC0204: ErrorCode = ErrorCode::new(204);
pub const SQC0205: ErrorCode = ErrorCode::new(205);

// Type name parse errors
pub const SQC0300: ErrorCode = ErrorCode::new(300);
pub const SQC0301: ErrorCode = ErrorCode::new(301);

// Configuration errors
pub const SQC0400: ErrorCode = ErrorCode::new(400);
pub const SQC0401: ErrorCode = ErrorCode::new(401);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(SQC0001.to_string(), "SQC0001");
        assert_eq!(SQC0104.to_string(), "SQC0104");
    }

    #[test]
    fn test_error_categories() {
        assert!(SQC0002.is_type_error());
        assert!(!SQC0002.is_coercion_error());

        assert!(SQC0101.is_coercion_error());
        assert!(SQC0204.is_statement_error());
        assert!(SQC0400.is_config_error());
        assert!(!SQC0400.is_statement_error());
        assert!(SQC0301.is_parse_error());
        assert!(!SQC0301.is_config_error());
    }

    #[test]
    fn test_error_info() {
        assert_eq!(SQC0100.info().description, "Incompatible types");
        assert!(SQC0204.info().help.is_some());
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
    }
}
