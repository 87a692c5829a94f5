//! Statement-level implicit coercion
//!
//! This crate applies the type resolvers of `sqlcoerce-types` at the call
//! sites a SQL validator meets:
//! - Set operations (UNION, INTERSECT, EXCEPT), CASE and COALESCE
//! - Operators: arithmetic, comparison, BETWEEN, concatenation
//! - Family-constrained function operands
//! - INSERT and UPDATE sources against a target table
//!
//! Each call site returns the reconciled type together with the casts the
//! validator has to insert. A cast is only recorded where the target differs
//! from the source ignoring nullability, and it keeps the source's
//! nullability.

mod assignment;
mod catalog;
mod error;
mod operator;
mod set_op;

pub use assignment::AssignmentCoercion;
pub use catalog::{ColumnDef, TableDef};
pub use error::CoercionError;
pub use operator::{ArithmeticOp, ComparisonOp, OperandCoercion, OperatorCoercion};
pub use set_op::{BranchCoercion, SetOpCoercion, SetOperator};

use serde::{Deserialize, Serialize};
use sqlcoerce_types::{SqlTypeFactory, TypeCoercer, TypeDescriptor, TypeFactory};
use std::fmt;

/// Result type for call-site coercion
pub type Result<T> = std::result::Result<T, CoercionError>;

/// Position of an expression that receives an implicit cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastTarget {
    /// Operand of an operator or function call
    Operand(usize),
    /// Source item of an INSERT, or assignment of an UPDATE
    Column(usize),
    /// Column of a set operation branch
    BranchColumn { branch: usize, column: usize },
    /// CASE branch or COALESCE operand
    Branch(usize),
}

impl fmt::Display for CastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand(i) => write!(f, "operand {}", i),
            Self::Column(i) => write!(f, "column {}", i),
            Self::BranchColumn { branch, column } => write!(f, "branch {} column {}", branch, column),
            Self::Branch(i) => write!(f, "branch {}", i),
        }
    }
}

/// A cast the validator must insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplicitCast {
    pub target: CastTarget,
    pub from: TypeDescriptor,
    pub to: TypeDescriptor,
}

impl ImplicitCast {
    /// The cast of `from` to `to` at `target`, if one is needed
    ///
    /// `to` takes the nullability of `from`.
    pub fn between(target: CastTarget, from: &TypeDescriptor, to: &TypeDescriptor) -> Option<Self> {
        if from.equals_sans_nullability(to) {
            return None;
        }
        let cast = Self {
            target,
            from: from.clone(),
            to: to.with_nullable(from.nullable),
        };
        log::trace!("implicit cast at {}: {} -> {}", cast.target, cast.from, cast.to);
        Some(cast)
    }
}

impl fmt::Display for ImplicitCast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: CAST({} AS {})", self.target, self.from, self.to)
    }
}

/// Applies implicit coercion at statement call sites
#[derive(Debug, Clone)]
pub struct StatementCoercer<F = SqlTypeFactory> {
    coercer: TypeCoercer<F>,
}

impl StatementCoercer<SqlTypeFactory> {
    /// Create a statement coercer over the default type factory
    pub fn new() -> Self {
        Self::with_factory(SqlTypeFactory::default())
    }
}

impl Default for StatementCoercer<SqlTypeFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: TypeFactory> StatementCoercer<F> {
    /// Create a statement coercer over a custom factory
    pub fn with_factory(factory: F) -> Self {
        Self {
            coercer: TypeCoercer::with_factory(factory),
        }
    }

    /// The underlying type resolvers
    pub fn coercer(&self) -> &TypeCoercer<F> {
        &self.coercer
    }

    fn factory(&self) -> &F {
        self.coercer.factory()
    }
}

/// Render types as a comma separated list
fn render_types<'a>(types: impl IntoIterator<Item = &'a TypeDescriptor>) -> String {
    types
        .into_iter()
        .map(TypeDescriptor::full_type_string)
        .collect::<Vec<_>>()
        .join(", ")
}
