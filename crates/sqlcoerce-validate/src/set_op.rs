//! Multi-branch reconciliation: set operations, CASE and COALESCE
//!
//! Branch types are folded through the wider-type resolver with string
//! promotion enabled, character branches first. The reconciled type is
//! nullable when any branch is.

use crate::{CastTarget, CoercionError, ImplicitCast, Result, StatementCoercer, render_types};
use serde::{Deserialize, Serialize};
use sqlcoerce_types::{RowField, TypeDescriptor, TypeFactory};
use std::fmt;

/// Set operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

impl fmt::Display for SetOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Union => write!(f, "UNION"),
            Self::Intersect => write!(f, "INTERSECT"),
            Self::Except => write!(f, "EXCEPT"),
        }
    }
}

/// Reconciled row type of a set operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOpCoercion {
    /// NOT NULL row; column names come from the first branch
    pub row_type: TypeDescriptor,
    pub casts: Vec<ImplicitCast>,
}

/// Reconciled type of CASE branches or COALESCE operands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCoercion {
    pub result_type: TypeDescriptor,
    pub casts: Vec<ImplicitCast>,
}

impl<F: TypeFactory> StatementCoercer<F> {
    /// Reconcile the row types of the branches of a set operation
    ///
    /// Every branch must be a row with the first branch's column count.
    /// No branches yield an empty row.
    pub fn set_operation(&self, op: SetOperator, branches: &[TypeDescriptor]) -> Result<SetOpCoercion> {
        let rows = branches
            .iter()
            .enumerate()
            .map(|(branch, ty)| {
                ty.row_fields().ok_or_else(|| CoercionError::NotARow {
                    branch,
                    found: ty.full_type_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let Some(first) = rows.first() else {
            return Ok(SetOpCoercion {
                row_type: TypeDescriptor::row(Vec::new()),
                casts: Vec::new(),
            });
        };
        let arity = first.len();
        if let Some((branch, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != arity) {
            log::debug!("{} branch {} has {} columns, expected {}", op, branch, row.len(), arity);
            return Err(CoercionError::SetOperationArity {
                branch,
                expected: arity,
                found: row.len(),
            });
        }

        let mut fields = Vec::with_capacity(arity);
        let mut casts = Vec::new();
        for (index, head) in first.iter().enumerate() {
            let column: Vec<TypeDescriptor> = rows.iter().map(|r| r[index].field_type.clone()).collect();
            let Some(widened) = self.coercer.wider_type_for(&column, true) else {
                log::debug!("{} column {} ('{}') has no common type", op, index, head.name);
                return Err(CoercionError::SetOperationColumn {
                    index,
                    column: head.name.clone(),
                    types: render_types(&column),
                });
            };
            let target = widened.with_nullable(column.iter().any(|t| t.nullable));
            casts.extend(column.iter().enumerate().filter_map(|(branch, ty)| {
                ImplicitCast::between(CastTarget::BranchColumn { branch, column: index }, ty, &target)
            }));
            fields.push(RowField::new(head.name.clone(), target));
        }

        Ok(SetOpCoercion {
            row_type: TypeDescriptor::row(fields),
            casts,
        })
    }

    /// Reconcile the THEN branches and the ELSE branch of a CASE
    ///
    /// A missing ELSE is an implicit NULL branch: it makes the result
    /// nullable and receives no cast.
    pub fn case_when(
        &self,
        then_types: &[TypeDescriptor],
        else_type: Option<&TypeDescriptor>,
    ) -> Result<BranchCoercion> {
        let mut branches = then_types.to_vec();
        branches.push(else_type.cloned().unwrap_or_else(TypeDescriptor::null));
        let explicit = then_types.len() + usize::from(else_type.is_some());
        self.reconcile_branches("CASE", &branches, explicit)
    }

    /// Reconcile the operands of COALESCE
    pub fn coalesce(&self, operands: &[TypeDescriptor]) -> Result<BranchCoercion> {
        self.reconcile_branches("COALESCE", operands, operands.len())
    }

    /// Fold `branches`; only the first `explicit` branches receive casts
    fn reconcile_branches(
        &self,
        construct: &str,
        branches: &[TypeDescriptor],
        explicit: usize,
    ) -> Result<BranchCoercion> {
        let Some(widened) = self.coercer.wider_type_for(branches, true) else {
            log::debug!("{} branches have no common type", construct);
            return Err(CoercionError::IncompatibleTypes {
                construct: construct.to_string(),
                types: render_types(branches),
            });
        };
        let result_type = widened.with_nullable(branches.iter().any(|t| t.nullable));
        let casts = branches
            .iter()
            .take(explicit)
            .enumerate()
            .filter_map(|(i, ty)| ImplicitCast::between(CastTarget::Branch(i), ty, &result_type))
            .collect();
        Ok(BranchCoercion { result_type, casts })
    }
}
