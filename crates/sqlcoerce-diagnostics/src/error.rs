//! Coercion error types

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A diagnostic message with context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context or help
    pub help: Option<String>,
    /// Related information
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            help: None,
            related: Vec::new(),
        }
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add related information
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }
}

#[cfg(feature = "colored")]
impl Diagnostic {
    /// Render for a terminal: help and related notes on their own lines
    pub fn to_colored_string(&self) -> String {
        use colored::Colorize;

        let mut out = format!("{}[{}]: {}", "error".red().bold(), self.code.to_string().bold(), self.message);
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {}", "help:".cyan().bold(), help));
        }
        for info in &self.related {
            match &info.subject {
                Some(subject) => {
                    out.push_str(&format!("\n  {} {}: {}", "note:".cyan(), subject, info.message));
                }
                None => out.push_str(&format!("\n  {} {}", "note:".cyan(), info.message)),
            }
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {} - {}", self.code, self.message)?;
        if let Some(help) = &self.help {
            write!(f, " ({})", help)?;
        }
        Ok(())
    }
}

/// Related diagnostic information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedInfo {
    /// Name of the column, operand or branch the note refers to
    pub subject: Option<String>,
    /// Message explaining the relationship
    pub message: String,
}

impl RelatedInfo {
    /// Create new related info
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            subject: None,
            message: message.into(),
        }
    }

    /// Set the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

/// Main coercion error type
#[derive(Debug, Clone, Error)]
pub enum SqlError {
    /// Invalid type construction
    #[error("{code}: {message}")]
    Type { code: ErrorCode, message: String },

    /// Coercion or statement shape failure
    #[error("{code}: {message}")]
    Coercion {
        code: ErrorCode,
        message: String,
        related: Vec<RelatedInfo>,
    },

    /// Malformed type name or family name
    #[error("{code}: {message}")]
    Parse { code: ErrorCode, message: String },

    /// Configuration error
    #[error("{code}: {message}")]
    Config { code: ErrorCode, message: String },
}

impl SqlError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Type { code, .. }
            | Self::Coercion { code, .. }
            | Self::Parse { code, .. }
            | Self::Config { code, .. } => *code,
        }
    }

    /// Convert to a diagnostic, with the registry's help text for the code
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, message, related) = match self {
            Self::Type { code, message } | Self::Parse { code, message } | Self::Config { code, message } => {
                (*code, message, &[][..])
            }
            Self::Coercion { code, message, related } => (*code, message, related.as_slice()),
        };
        let mut diag = Diagnostic::error(code, message.clone());
        if let Some(help) = code.info().help {
            diag = diag.with_help(help);
        }
        related
            .iter()
            .cloned()
            .fold(diag, Diagnostic::with_related)
    }
}

/// Builder for creating errors with fluent API
pub struct ErrorBuilder {
    code: ErrorCode,
    message: String,
    related: Vec<RelatedInfo>,
}

impl ErrorBuilder {
    /// Create a new error builder
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Attach a note about a column, operand or branch
    pub fn related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    /// Build a type construction error
    pub fn type_error(self) -> SqlError {
        SqlError::Type {
            code: self.code,
            message: self.message,
        }
    }

    /// Build a coercion error
    pub fn coercion(self) -> SqlError {
        SqlError::Coercion {
            code: self.code,
            message: self.message,
            related: self.related,
        }
    }

    /// Build a parse error
    pub fn parse(self) -> SqlError {
        SqlError::Parse {
            code: self.code,
            message: self.message,
        }
    }

    /// Build a configuration error
    pub fn config(self) -> SqlError {
        SqlError::Config {
            code: self.code,
            message: self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SQC0101, SQC0104, SQC0300, SQC0400};

    #[test]
    fn test_error_builder() {
        let err = ErrorBuilder::new(SQC0104, "Cannot assign to target field 't1_int'")
            .related(RelatedInfo::new("source type is BOOLEAN").with_subject("t1_int"))
            .coercion();

        assert!(matches!(err, SqlError::Coercion { .. }));
        assert_eq!(err.code(), SQC0104);

        let diag = err.to_diagnostic();
        assert_eq!(diag.related.len(), 1);
        assert_eq!(diag.related[0].subject.as_deref(), Some("t1_int"));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(SQC0101, "Cannot cast BOOLEAN to NUMERIC");

        assert!(diag.to_string().contains("SQC0101"));
        assert!(diag.to_string().starts_with("error"));
    }

    #[test]
    fn test_help_from_registry() {
        let err = ErrorBuilder::new(SQC0101, "Cannot cast BOOLEAN to NUMERIC").coercion();
        assert_eq!(
            err.to_diagnostic().help.as_deref(),
            Some("Add an explicit CAST to the required type")
        );

        let err = ErrorBuilder::new(SQC0400, "bad config").config();
        assert_eq!(err.code(), SQC0400);
        assert!(err.to_diagnostic().related.is_empty());
    }

    #[test]
    fn test_parse_error_diagnostic() {
        let err = ErrorBuilder::new(SQC0300, "found 'X' expected type name").parse();
        assert_eq!(err.code(), SQC0300);
        assert_eq!(
            err.to_diagnostic().to_string(),
            "error: SQC0300 - found 'X' expected type name (Write types as they are rendered, e.g. DECIMAL(10, 2) NOT NULL or INTEGER ARRAY)"
        );
    }

    #[cfg(feature = "colored")]
    #[test]
    fn test_colored_rendering_keeps_text() {
        colored::control::set_override(false);
        let diag = Diagnostic::error(SQC0104, "Cannot assign")
            .with_help("cast it")
            .with_related(RelatedInfo::new("source type is DATE").with_subject("t1_int"));
        assert_eq!(
            diag.to_colored_string(),
            "error[SQC0104]: Cannot assign\n  help: cast it\n  note: t1_int: source type is DATE"
        );
    }

    #[test]
    fn test_diagnostic_serializes() {
        let diag = Diagnostic::error(SQC0101, "narrowing cast");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["code"], 101);
        assert_eq!(json["message"], "narrowing cast");
    }
}
