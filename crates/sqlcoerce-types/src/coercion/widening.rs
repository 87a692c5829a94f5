use super::TypeCoercer;
use super::common::zip_row_fields;
use crate::{TypeDescriptor, TypeFactory, TypeKind};

impl<F: TypeFactory> TypeCoercer<F> {
    /// Find the wider type of two types
    ///
    /// Tries, in order: the tightest common type, DECIMAL widening, string
    /// promotion (only when `allow_string_promotion` is set), and composite
    /// recursion.
    pub fn wider_type(
        &self,
        a: &TypeDescriptor,
        b: &TypeDescriptor,
        allow_string_promotion: bool,
    ) -> Option<TypeDescriptor> {
        if let Some(ty) = self.tightest_common_type(a, b) {
            return Some(ty);
        }
        if let Some(ty) = self.wider_decimal(a, b) {
            return Some(ty);
        }
        if allow_string_promotion {
            if let Some(ty) = self.promote_to_varchar(a, b) {
                return Some(ty);
            }
        }
        self.wider_composite(a, b, allow_string_promotion)
    }

    /// Fold [`Self::wider_type`] over a list
    ///
    /// With string promotion the character types are folded first, so every
    /// other atomic type meets a character accumulator; otherwise the list is
    /// folded left to right. Returns `None` for an empty list or as soon as a
    /// pair is incompatible.
    pub fn wider_type_for(
        &self,
        types: &[TypeDescriptor],
        allow_string_promotion: bool,
    ) -> Option<TypeDescriptor> {
        let ordered: Vec<&TypeDescriptor> = if allow_string_promotion {
            let (character, other): (Vec<_>, Vec<_>) = types.iter().partition(|t| t.is_character());
            character.into_iter().chain(other).collect()
        } else {
            types.iter().collect()
        };
        let (first, rest) = ordered.split_first()?;
        rest.iter().try_fold((*first).clone(), |acc, ty| {
            self.wider_type(&acc, ty, allow_string_promotion)
        })
    }

    /// DECIMAL with another numeric: integer digits are kept, scale is
    /// truncated to fit; an approximate operand wins
    fn wider_decimal(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> Option<TypeDescriptor> {
        if a.is_numeric() && b.is_numeric() && (a.is_decimal() || b.is_decimal()) {
            return self.factory.least_restrictive(&[a.clone(), b.clone()]);
        }
        None
    }

    /// An atomic type with a character type promotes to unbounded VARCHAR
    fn promote_to_varchar(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> Option<TypeDescriptor> {
        if a.is_character() && b.is_character() {
            return None;
        }
        if (a.is_character() && b.is_atomic()) || (a.is_atomic() && b.is_character()) {
            return Some(TypeDescriptor::varchar(None).with_nullable(a.nullable || b.nullable));
        }
        None
    }

    fn wider_composite(
        &self,
        a: &TypeDescriptor,
        b: &TypeDescriptor,
        promote: bool,
    ) -> Option<TypeDescriptor> {
        let nullable = a.nullable || b.nullable;
        let ty = match (&a.kind, &b.kind) {
            (TypeKind::Array { element: e1 }, TypeKind::Array { element: e2 }) => {
                TypeDescriptor::array(self.wider_type(e1, e2, promote)?)
            }
            (TypeKind::Map { key: k1, value: v1 }, TypeKind::Map { key: k2, value: v2 }) => {
                TypeDescriptor::map(
                    self.wider_type(k1, k2, promote)?,
                    self.wider_type(v1, v2, promote)?,
                )
            }
            (TypeKind::Row { fields: f1 }, TypeKind::Row { fields: f2 }) => {
                TypeDescriptor::row(zip_row_fields(f1, f2, |x, y| self.wider_type(x, y, promote))?)
            }
            _ => return None,
        };
        Some(ty.with_nullable(nullable))
    }
}
