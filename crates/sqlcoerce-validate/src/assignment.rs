//! INSERT and UPDATE source coercion
//!
//! A source value satisfies a target column when the types match ignoring
//! nullability, when the source is NULL, when the source implicitly casts
//! into the column's family, or when the column is BOOLEAN and the source is
//! numeric or character. Composite columns are checked child by child.

use crate::{CastTarget, CoercionError, ColumnDef, ImplicitCast, Result, StatementCoercer, TableDef};
use serde::{Deserialize, Serialize};
use sqlcoerce_types::{TypeDescriptor, TypeFactory, TypeKind};
use std::collections::HashSet;

/// Result of coercing the sources of an INSERT or UPDATE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentCoercion {
    /// Row type of the target table
    pub row_type: TypeDescriptor,
    /// Casts keyed by source position
    pub casts: Vec<ImplicitCast>,
}

impl<F: TypeFactory> StatementCoercer<F> {
    /// Coerce the source row of an INSERT into `table`
    ///
    /// Without a column list the sources map to every column in declaration
    /// order. With a column list, any omitted column must be nullable or have
    /// a default; that check runs before the sources are looked at.
    pub fn insert(
        &self,
        table: &TableDef,
        target_columns: Option<&[&str]>,
        source: &[TypeDescriptor],
    ) -> Result<AssignmentCoercion> {
        let targets: Vec<&ColumnDef> = match target_columns {
            None => table.columns.values().collect(),
            Some(names) => {
                let targets = resolve_columns(table, names.iter().copied())?;
                if let Some(missing) = table
                    .columns
                    .values()
                    .find(|c| !c.may_omit() && !names.contains(&c.name.as_str()))
                {
                    log::debug!("INSERT into '{}' omits column '{}'", table.name, missing.name);
                    return Err(CoercionError::MissingNotNullColumn {
                        column: missing.name.clone(),
                    });
                }
                targets
            }
        };

        if targets.len() != source.len() {
            return Err(CoercionError::ColumnCountMismatch {
                expected: targets.len(),
                found: source.len(),
            });
        }
        self.assign(table, targets.into_iter().zip(source))
    }

    /// Coerce the assignments `column = value` of an UPDATE of `table`
    pub fn update(&self, table: &TableDef, assignments: &[(&str, TypeDescriptor)]) -> Result<AssignmentCoercion> {
        let targets = resolve_columns(table, assignments.iter().map(|(name, _)| *name))?;
        self.assign(table, targets.into_iter().zip(assignments.iter().map(|(_, ty)| ty)))
    }

    /// Whether a value of type `source` can be stored in a `target` column
    pub fn can_assign(&self, source: &TypeDescriptor, target: &TypeDescriptor) -> bool {
        if source.equals_sans_nullability(target) || source.is_null() {
            return true;
        }
        if target.is_boolean() && (source.is_numeric() || source.is_character()) {
            return true;
        }
        match (&source.kind, &target.kind) {
            (TypeKind::Array { element: s }, TypeKind::Array { element: t }) => self.can_assign(s, t),
            (TypeKind::Map { key: sk, value: sv }, TypeKind::Map { key: tk, value: tv }) => {
                self.can_assign(sk, tk) && self.can_assign(sv, tv)
            }
            (TypeKind::Row { fields: s }, TypeKind::Row { fields: t }) => {
                s.len() == t.len()
                    && s.iter()
                        .zip(t)
                        .all(|(x, y)| self.can_assign(&x.field_type, &y.field_type))
            }
            _ => target
                .family()
                .is_some_and(|family| self.coercer.can_implicitly_cast(source, family)),
        }
    }

    fn assign<'a>(
        &self,
        table: &TableDef,
        pairs: impl Iterator<Item = (&'a ColumnDef, &'a TypeDescriptor)>,
    ) -> Result<AssignmentCoercion> {
        let mut casts = Vec::new();
        for (position, (column, source)) in pairs.enumerate() {
            if !self.can_assign(source, &column.column_type) {
                log::debug!(
                    "cannot assign {} to column '{}' of '{}'",
                    source,
                    column.name,
                    table.name
                );
                return Err(CoercionError::ColumnNotAssignable {
                    column: column.name.clone(),
                    source_type: source.full_type_string(),
                    target_type: column.column_type.full_type_string(),
                });
            }
            casts.extend(ImplicitCast::between(
                CastTarget::Column(position),
                source,
                &column.column_type,
            ));
        }
        Ok(AssignmentCoercion {
            row_type: table.row_type(),
            casts,
        })
    }
}

/// Look up named columns, rejecting unknown and repeated names
fn resolve_columns<'t, 'n>(
    table: &'t TableDef,
    names: impl Iterator<Item = &'n str>,
) -> Result<Vec<&'t ColumnDef>> {
    let mut seen = HashSet::new();
    names
        .map(|name| {
            let column = table.column(name).ok_or_else(|| CoercionError::UnknownColumn {
                table: table.name.clone(),
                column: name.to_string(),
            })?;
            if !seen.insert(name) {
                return Err(CoercionError::DuplicateColumn {
                    column: name.to_string(),
                });
            }
            Ok(column)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqlcoerce_types::RowField;

    fn table() -> TableDef {
        TableDef::new("t")
            .with_column(ColumnDef::new("name", TypeDescriptor::varchar(Some(20))))
            .with_column(ColumnDef::new("flag", TypeDescriptor::boolean()))
            .with_column(ColumnDef::new("note", TypeDescriptor::varchar(None).with_nullable(true)))
            .with_column(ColumnDef::new("created", TypeDescriptor::timestamp()).with_default())
    }

    #[test]
    fn test_boolean_column_accepts_numbers_and_strings() {
        let c = StatementCoercer::new();
        let boolean = TypeDescriptor::boolean();
        assert!(c.can_assign(&TypeDescriptor::integer(), &boolean));
        assert!(c.can_assign(&TypeDescriptor::varchar(None), &boolean));
        assert!(!c.can_assign(&TypeDescriptor::date(), &boolean));
        // boolean into a number is not an implicit cast
        assert!(!c.can_assign(&boolean, &TypeDescriptor::integer()));
    }

    #[test]
    fn test_composite_assignment() {
        let c = StatementCoercer::new();
        assert!(c.can_assign(
            &TypeDescriptor::array(TypeDescriptor::smallint()),
            &TypeDescriptor::array(TypeDescriptor::varchar(None))
        ));
        assert!(!c.can_assign(
            &TypeDescriptor::array(TypeDescriptor::binary(1)),
            &TypeDescriptor::array(TypeDescriptor::integer())
        ));
        let source = TypeDescriptor::row(vec![RowField::new("x", TypeDescriptor::integer())]);
        let target = TypeDescriptor::row(vec![RowField::new("y", TypeDescriptor::bigint())]);
        assert!(c.can_assign(&source, &target));
        assert!(!c.can_assign(&source, &TypeDescriptor::row(Vec::new())));
        assert!(!c.can_assign(&source, &TypeDescriptor::integer()));
    }

    #[test]
    fn test_insert_all_columns() {
        let c = StatementCoercer::new();
        let t = table();
        let result = c
            .insert(
                &t,
                None,
                &[
                    TypeDescriptor::integer(),
                    TypeDescriptor::smallint(),
                    TypeDescriptor::null(),
                    TypeDescriptor::date(),
                ],
            )
            .unwrap();
        assert_eq!(result.row_type, t.row_type());
        let positions: Vec<CastTarget> = result.casts.iter().map(|c| c.target).collect();
        assert_eq!(
            positions,
            vec![
                CastTarget::Column(0),
                CastTarget::Column(1),
                CastTarget::Column(2),
                CastTarget::Column(3),
            ]
        );
        assert_eq!(result.casts[2].to, TypeDescriptor::varchar(None).with_nullable(true));
    }

    #[test]
    fn test_insert_column_list() {
        let c = StatementCoercer::new();
        let t = table();
        let result = c
            .insert(&t, Some(&["flag", "name"]), &[TypeDescriptor::boolean(), TypeDescriptor::char(3)])
            .unwrap();
        assert_eq!(result.casts.len(), 1);
        assert_eq!(result.casts[0].target, CastTarget::Column(1));
        assert_eq!(result.casts[0].to, TypeDescriptor::varchar(Some(20)));
    }

    #[test]
    fn test_insert_missing_column_reported_first() {
        let c = StatementCoercer::new();
        // also mistyped and short: the missing column still wins
        let err = c
            .insert(&table(), Some(&["name"]), &[TypeDescriptor::date(), TypeDescriptor::date()])
            .unwrap_err();
        assert_eq!(
            err,
            CoercionError::MissingNotNullColumn {
                column: "flag".to_string()
            }
        );
    }

    #[test]
    fn test_insert_shape_errors() {
        let c = StatementCoercer::new();
        let t = table();
        assert_eq!(
            c.insert(&t, None, &[TypeDescriptor::integer()]).unwrap_err(),
            CoercionError::ColumnCountMismatch { expected: 4, found: 1 }
        );
        assert_eq!(
            c.insert(&t, Some(&["nope"]), &[]).unwrap_err(),
            CoercionError::UnknownColumn {
                table: "t".to_string(),
                column: "nope".to_string()
            }
        );
        assert_eq!(
            c.insert(
                &t,
                Some(&["name", "flag", "name"]),
                &vec![TypeDescriptor::char(1); 3]
            )
            .unwrap_err(),
            CoercionError::DuplicateColumn {
                column: "name".to_string()
            }
        );
    }

    #[test]
    fn test_update() {
        let c = StatementCoercer::new();
        let t = table();
        let result = c
            .update(&t, &[("flag", TypeDescriptor::decimal(3, 1)), ("created", TypeDescriptor::date())])
            .unwrap();
        assert_eq!(result.row_type, t.row_type());
        assert_eq!(result.casts.len(), 2);

        let err = c
            .update(&t, &[("created", TypeDescriptor::time())])
            .unwrap_err();
        assert_eq!(
            err,
            CoercionError::ColumnNotAssignable {
                column: "created".to_string(),
                source_type: "TIME(0) NOT NULL".to_string(),
                target_type: "TIMESTAMP(0) NOT NULL".to_string(),
            }
        );
    }
}
