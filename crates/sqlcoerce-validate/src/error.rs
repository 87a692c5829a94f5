//! Call-site coercion errors
//!
//! Every rejection names the column, operand or branch it concerns and
//! carries the rendered types involved. Conversion into [`SqlError`] keeps
//! that context as related information.

use sqlcoerce_diagnostics::{
    ErrorBuilder, ErrorCode, RelatedInfo, SQC0100, SQC0101, SQC0102, SQC0103, SQC0104, SQC0105,
    SQC0106, SQC0200, SQC0201, SQC0202, SQC0203, SQC0204, SQC0205, SqlError,
};
use thiserror::Error;

/// Coercion failures at statement call sites
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// CASE or COALESCE branches have no common type
    #[error("Incompatible types in {construct}: {types}")]
    IncompatibleTypes { construct: String, types: String },

    /// An operand cannot be implicitly cast into its declared family
    #[error("Cannot implicitly cast operand {index} of type {source_type} to {family}")]
    IllegalImplicitCast {
        index: usize,
        source_type: String,
        family: String,
    },

    /// An operator has no coercion for its operand types
    #[error("Cannot apply '{operator}' to arguments of type '{operands}'")]
    IncompatibleOperands { operator: String, operands: String },

    /// A set operation column has no common type across branches
    #[error("Type mismatch in column {index} ('{column}') of set operation: {types}")]
    SetOperationColumn {
        index: usize,
        column: String,
        types: String,
    },

    /// A source value cannot be assigned to its target column
    #[error("Cannot assign to target field '{column}' of type {target_type} from source field of type {source_type}")]
    ColumnNotAssignable {
        column: String,
        source_type: String,
        target_type: String,
    },

    /// Character and binary strings in one concatenation
    #[error("Cannot apply '||' to arguments of type '{operands}'")]
    MixedConcatenation { operands: String },

    /// A concatenation operand that is neither a string nor castable to one
    #[error("Cannot concatenate operand {index} of type {source_type}")]
    InvalidConcatOperand { index: usize, source_type: String },

    /// A set operation branch has a different column count than the first
    #[error("Set operator branch {branch} has {found} columns, expected {expected}")]
    SetOperationArity {
        branch: usize,
        expected: usize,
        found: usize,
    },

    /// A set operation branch is not a row type
    #[error("Set operator branch {branch} has non-row type {found}")]
    NotARow { branch: usize, found: String },

    /// Source and target column counts differ
    #[error("Number of INSERT target columns ({expected}) does not equal number of source items ({found})")]
    ColumnCountMismatch { expected: usize, found: usize },

    /// A target column does not exist in the table
    #[error("Unknown target column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// An omitted column requires a value
    #[error("Column '{column}' has no default value and does not allow NULLs")]
    MissingNotNullColumn { column: String },

    /// A target column is listed more than once
    #[error("Target column '{column}' is assigned more than once")]
    DuplicateColumn { column: String },
}

impl CoercionError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::IncompatibleTypes { .. } => SQC0100,
            Self::IllegalImplicitCast { .. } => SQC0101,
            Self::IncompatibleOperands { .. } => SQC0102,
            Self::SetOperationColumn { .. } => SQC0103,
            Self::ColumnNotAssignable { .. } => SQC0104,
            Self::MixedConcatenation { .. } => SQC0105,
            Self::InvalidConcatOperand { .. } => SQC0106,
            Self::SetOperationArity { .. } => SQC0200,
            Self::NotARow { .. } => SQC0201,
            Self::ColumnCountMismatch { .. } => SQC0202,
            Self::UnknownColumn { .. } => SQC0203,
            Self::MissingNotNullColumn { .. } => SQC0204,
            Self::DuplicateColumn { .. } => SQC0205,
        }
    }

    /// The column, operand or branch the error refers to
    fn related(&self) -> Option<RelatedInfo> {
        let info = match self {
            Self::IllegalImplicitCast { index, family, .. } => {
                RelatedInfo::new(format!("operand requires a {family} value"))
                    .with_subject(format!("operand {index}"))
            }
            Self::InvalidConcatOperand { index, source_type } => {
                RelatedInfo::new(format!("{source_type} has no character representation"))
                    .with_subject(format!("operand {index}"))
            }
            Self::SetOperationColumn { column, .. } => {
                RelatedInfo::new("column name taken from the first branch").with_subject(column.clone())
            }
            Self::SetOperationArity { branch, .. } | Self::NotARow { branch, .. } => {
                RelatedInfo::new("set operation branch").with_subject(format!("branch {branch}"))
            }
            Self::ColumnNotAssignable { column, target_type, .. } => {
                RelatedInfo::new(format!("column declared as {target_type}")).with_subject(column.clone())
            }
            Self::UnknownColumn { table, column } => {
                RelatedInfo::new(format!("not a column of '{table}'")).with_subject(column.clone())
            }
            Self::MissingNotNullColumn { column } | Self::DuplicateColumn { column } => {
                RelatedInfo::new("target column").with_subject(column.clone())
            }
            Self::IncompatibleTypes { .. }
            | Self::IncompatibleOperands { .. }
            | Self::MixedConcatenation { .. }
            | Self::ColumnCountMismatch { .. } => return None,
        };
        Some(info)
    }
}

impl From<CoercionError> for SqlError {
    fn from(err: CoercionError) -> Self {
        let mut builder = ErrorBuilder::new(err.code(), err.to_string());
        if let Some(info) = err.related() {
            builder = builder.related(info);
        }
        builder.coercion()
    }
}
