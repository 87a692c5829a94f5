//! Derived type categories
//!
//! Representative descriptor lists per category, built from a factory. They
//! are plain values recomputed on demand, used to drive exhaustive checks
//! over the implicit-cast table.

use crate::{RowField, ScalarKind, TimeUnit, TypeDescriptor, TypeFactory};

/// Representative types grouped by category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCategories {
    pub integer_types: Vec<TypeDescriptor>,
    pub numeric_types: Vec<TypeDescriptor>,
    pub datetime_types: Vec<TypeDescriptor>,
    pub character_types: Vec<TypeDescriptor>,
    pub binary_types: Vec<TypeDescriptor>,
    pub boolean_types: Vec<TypeDescriptor>,
    /// Datetime, numeric, string and boolean types
    pub atomic_types: Vec<TypeDescriptor>,
    /// Array, map and row samples
    pub complex_types: Vec<TypeDescriptor>,
    /// Atomic and complex types plus NULL and a day-time interval
    pub all_types: Vec<TypeDescriptor>,
}

impl TypeCategories {
    /// Build the categories from a factory
    pub fn new<F: TypeFactory + ?Sized>(factory: &F) -> Self {
        let scalars = |kinds: &[ScalarKind]| -> Vec<TypeDescriptor> {
            kinds.iter().map(|k| factory.create_scalar(*k)).collect()
        };

        let integer_types = scalars(&[
            ScalarKind::TinyInt,
            ScalarKind::SmallInt,
            ScalarKind::Integer,
            ScalarKind::BigInt,
        ]);
        let mut numeric_types = integer_types.clone();
        numeric_types.extend(scalars(&[ScalarKind::Decimal, ScalarKind::Float, ScalarKind::Double]));

        let datetime_types = scalars(&[
            ScalarKind::Date,
            ScalarKind::Time,
            ScalarKind::Timestamp,
            ScalarKind::TimestampWithLocalTimeZone,
        ]);
        let character_types = scalars(&[ScalarKind::Char, ScalarKind::VarChar]);
        let binary_types = scalars(&[ScalarKind::Binary, ScalarKind::VarBinary]);
        let boolean_types = scalars(&[ScalarKind::Boolean]);

        let atomic_types: Vec<TypeDescriptor> = datetime_types
            .iter()
            .chain(&numeric_types)
            .chain(&character_types)
            .chain(&binary_types)
            .chain(&boolean_types)
            .cloned()
            .collect();

        let integer = factory.create_scalar(ScalarKind::Integer);
        let varchar = factory.create_scalar(ScalarKind::VarChar);
        let varbinary = factory.create_scalar(ScalarKind::VarBinary);
        let complex_types = vec![
            factory.create_array(integer.clone()),
            factory.create_array(varchar.clone()),
            factory.create_map(varchar.clone(), varchar.clone()),
            factory.create_row(vec![RowField::new("a1", varchar)]),
            factory.create_row(vec![
                RowField::new("a1", varbinary),
                RowField::new("a2", integer),
            ]),
        ];

        let mut all_types = atomic_types.clone();
        all_types.extend(complex_types.iter().cloned());
        all_types.push(factory.create_scalar(ScalarKind::Null));
        all_types.push(TypeDescriptor::interval(TimeUnit::Day, TimeUnit::Minute));

        Self {
            integer_types,
            numeric_types,
            datetime_types,
            character_types,
            binary_types,
            boolean_types,
            atomic_types,
            complex_types,
            all_types,
        }
    }
}
