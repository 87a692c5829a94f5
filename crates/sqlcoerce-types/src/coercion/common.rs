use super::TypeCoercer;
use crate::{RowField, TypeDescriptor, TypeFactory, TypeKind};

impl<F: TypeFactory> TypeCoercer<F> {
    /// Find the tightest common type of two types
    ///
    /// The tightest common type is one both operands convert to without
    /// losing information:
    /// - equal types (ignoring outer nullability) unify to themselves
    /// - NULL unifies with anything, forcing nullability
    /// - character with character, binary with binary
    /// - integers and approximate numerics, but never a DECIMAL with a
    ///   different numeric type
    /// - DATE with TIMESTAMP yields TIMESTAMP
    /// - arrays, maps and rows recurse into their children
    ///
    /// FLOAT with DOUBLE resolves to the first operand.
    pub fn tightest_common_type(
        &self,
        a: &TypeDescriptor,
        b: &TypeDescriptor,
    ) -> Option<TypeDescriptor> {
        let nullable = a.nullable || b.nullable;

        if a.equals_sans_nullability(b) {
            return Some(a.with_nullable(nullable));
        }
        if a.is_null() {
            return Some(b.with_nullable(true));
        }
        if b.is_null() {
            return Some(a.with_nullable(true));
        }

        if (a.is_character() && b.is_character()) || (a.is_binary() && b.is_binary()) {
            return self.factory.least_restrictive(&[a.clone(), b.clone()]);
        }

        if a.is_numeric() && b.is_numeric() && !a.is_decimal() && !b.is_decimal() {
            return self.factory.least_restrictive(&[a.clone(), b.clone()]);
        }

        match (&a.kind, &b.kind) {
            (TypeKind::Date, TypeKind::Timestamp { .. }) => Some(b.with_nullable(nullable)),
            (TypeKind::Timestamp { .. }, TypeKind::Date) => Some(a.with_nullable(nullable)),
            (TypeKind::Array { element: e1 }, TypeKind::Array { element: e2 }) => {
                let element = self.tightest_common_type(e1, e2)?;
                Some(TypeDescriptor::array(element).with_nullable(nullable))
            }
            (TypeKind::Map { key: k1, value: v1 }, TypeKind::Map { key: k2, value: v2 }) => {
                let key = self.tightest_common_type(k1, k2)?;
                let value = self.tightest_common_type(v1, v2)?;
                Some(TypeDescriptor::map(key, value).with_nullable(nullable))
            }
            (TypeKind::Row { fields: f1 }, TypeKind::Row { fields: f2 }) => {
                let fields = zip_row_fields(f1, f2, |x, y| self.tightest_common_type(x, y))?;
                Some(TypeDescriptor::row(fields).with_nullable(nullable))
            }
            _ => None,
        }
    }
}

/// Combine two rows field by field
///
/// Rows must have the same field count and names in the same order, and
/// every field pair must combine.
pub(super) fn zip_row_fields(
    f1: &[RowField],
    f2: &[RowField],
    mut combine: impl FnMut(&TypeDescriptor, &TypeDescriptor) -> Option<TypeDescriptor>,
) -> Option<Vec<RowField>> {
    if f1.len() != f2.len() {
        return None;
    }
    f1.iter()
        .zip(f2)
        .map(|(x, y)| {
            if x.name != y.name {
                return None;
            }
            combine(&x.field_type, &y.field_type).map(|t| RowField::new(x.name.clone(), t))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn coercer() -> TypeCoercer {
        TypeCoercer::new()
    }

    #[test]
    fn test_reflexive() {
        let c = coercer();
        let t = TypeDescriptor::decimal(5, 2);
        assert_eq!(c.tightest_common_type(&t, &t), Some(t.clone()));

        let nullable = t.with_nullable(true);
        assert_eq!(c.tightest_common_type(&t, &nullable), Some(nullable));
    }

    #[test]
    fn test_null_absorption() {
        let c = coercer();
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::null(), &TypeDescriptor::boolean()),
            Some(TypeDescriptor::boolean().with_nullable(true))
        );
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::varchar(Some(20)), &TypeDescriptor::null()),
            Some(TypeDescriptor::varchar(Some(20)).with_nullable(true))
        );
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::null(), &TypeDescriptor::null()),
            Some(TypeDescriptor::null())
        );
    }

    #[test]
    fn test_numeric() {
        let c = coercer();
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::tinyint(), &TypeDescriptor::bigint()),
            Some(TypeDescriptor::bigint())
        );
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::integer(), &TypeDescriptor::float()),
            Some(TypeDescriptor::float())
        );
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::float(), &TypeDescriptor::double()),
            Some(TypeDescriptor::float())
        );
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::double(), &TypeDescriptor::float()),
            Some(TypeDescriptor::double())
        );
    }

    #[test]
    fn test_decimal_never_unifies() {
        let c = coercer();
        let dec = TypeDescriptor::decimal(5, 2);
        assert_eq!(c.tightest_common_type(&dec, &TypeDescriptor::decimal(6, 2)), None);
        assert_eq!(c.tightest_common_type(&dec, &TypeDescriptor::integer()), None);
        assert_eq!(c.tightest_common_type(&TypeDescriptor::double(), &dec), None);
    }

    #[test]
    fn test_strings() {
        let c = coercer();
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::char(3), &TypeDescriptor::varchar(Some(10))),
            Some(TypeDescriptor::varchar(Some(10)))
        );
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::char(3), &TypeDescriptor::char(5)),
            Some(TypeDescriptor::char(5))
        );
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::char(1), &TypeDescriptor::integer()),
            None
        );
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::varchar(Some(20)), &TypeDescriptor::timestamp()),
            None
        );
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::char(1), &TypeDescriptor::binary(1)),
            None
        );
    }

    #[test]
    fn test_datetime() {
        let c = coercer();
        assert_eq!(
            c.tightest_common_type(
                &TypeDescriptor::date().with_nullable(true),
                &TypeDescriptor::timestamp()
            ),
            Some(TypeDescriptor::timestamp().with_nullable(true))
        );
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::time(), &TypeDescriptor::timestamp()),
            None
        );
        assert_eq!(
            c.tightest_common_type(
                &TypeDescriptor::timestamp(),
                &TypeDescriptor::timestamp_with_local_time_zone()
            ),
            None
        );
    }

    #[test]
    fn test_composites() {
        let c = coercer();
        assert_eq!(
            c.tightest_common_type(
                &TypeDescriptor::array(TypeDescriptor::integer()),
                &TypeDescriptor::array(TypeDescriptor::bigint())
            ),
            Some(TypeDescriptor::array(TypeDescriptor::bigint()))
        );
        assert_eq!(
            c.tightest_common_type(
                &TypeDescriptor::map(TypeDescriptor::varchar(None), TypeDescriptor::null()),
                &TypeDescriptor::map(TypeDescriptor::char(3), TypeDescriptor::integer())
            ),
            Some(TypeDescriptor::map(
                TypeDescriptor::varchar(None),
                TypeDescriptor::integer().with_nullable(true)
            ))
        );

        let row_a = TypeDescriptor::row(vec![RowField::new("a", TypeDescriptor::integer())]);
        let row_b = TypeDescriptor::row(vec![RowField::new("b", TypeDescriptor::integer())]);
        assert_eq!(c.tightest_common_type(&row_a, &row_b), None);
        assert_eq!(c.tightest_common_type(&row_a, &row_a), Some(row_a.clone()));

        let row_wide = TypeDescriptor::row(vec![RowField::new("a", TypeDescriptor::bigint())]);
        assert_eq!(c.tightest_common_type(&row_a, &row_wide), Some(row_wide));

        let row_dec = TypeDescriptor::row(vec![RowField::new("a", TypeDescriptor::decimal(5, 1))]);
        assert_eq!(c.tightest_common_type(&row_a, &row_dec), None);
    }

    #[test]
    fn test_boolean_only_with_boolean() {
        let c = coercer();
        assert_eq!(
            c.tightest_common_type(&TypeDescriptor::boolean(), &TypeDescriptor::integer()),
            None
        );
    }
}
