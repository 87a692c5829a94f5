//! SQL Type Coercion Rules
//!
//! This module implements implicit type reconciliation. It provides:
//! - Tightest common type (narrowest lossless unification of two types)
//! - Wider type (tightest plus DECIMAL widening, string promotion and
//!   composite recursion)
//! - The implicit-cast rule table (source type and target family to concrete
//!   target type)
//!
//! All operations are pure functions of their arguments and the factory's
//! configuration. Failure is reported as `None`; callers attach context.

mod common;
mod implicit_cast;
mod widening;

pub use implicit_cast::{CastRule, SourceClass, cast_rule};

use crate::{SqlTypeFactory, TypeFactory};

/// Type coercion engine over a [`TypeFactory`]
#[derive(Debug, Clone)]
pub struct TypeCoercer<F = SqlTypeFactory> {
    factory: F,
}

impl TypeCoercer<SqlTypeFactory> {
    /// Create a coercer over the default type factory
    pub fn new() -> Self {
        Self::with_factory(SqlTypeFactory::default())
    }
}

impl Default for TypeCoercer<SqlTypeFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: TypeFactory> TypeCoercer<F> {
    /// Create a coercer over a custom factory
    pub fn with_factory(factory: F) -> Self {
        Self { factory }
    }

    /// The underlying type factory
    pub fn factory(&self) -> &F {
        &self.factory
    }
}
