//! End-to-end scenarios across the parser, the resolvers and the call sites

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sqlcoerce::types::{IntegerKind, RowField, TimeUnit};
use sqlcoerce::validate::{ArithmeticOp, ColumnDef, SetOperator, TableDef};
use sqlcoerce::{SqlError, SqlTypeFactory, StatementCoercer, TypeDescriptor, TypeSystemConfig, parse_type};
use std::io::Write;

fn ty(name: &str) -> TypeDescriptor {
    parse_type(name, &SqlTypeFactory::default()).unwrap()
}

fn render_casts(casts: &[sqlcoerce::ImplicitCast]) -> String {
    casts.iter().map(|c| c.to_string()).collect::<Vec<_>>().join("\n")
}

#[test]
fn wide_decimals_follow_the_configured_precision() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "max_numeric_precision": 38, "max_numeric_scale": 38 }}"#).unwrap();
    let factory = SqlTypeFactory::new(TypeSystemConfig::from_file(file.path()).unwrap()).unwrap();

    let left = parse_type("DECIMAL(30, 10) NOT NULL", &factory).unwrap();
    let right = parse_type("DECIMAL(20, 5) NOT NULL", &factory).unwrap();
    let wide = StatementCoercer::with_factory(factory)
        .arithmetic(ArithmeticOp::Plus, &left, &right)
        .unwrap();
    assert_eq!(wide.result_type, TypeDescriptor::decimal(31, 10));

    // the default type system caps both operands at 19 digits first
    let narrow = StatementCoercer::new()
        .arithmetic(
            ArithmeticOp::Plus,
            &ty("DECIMAL(30, 10) NOT NULL"),
            &ty("DECIMAL(20, 5) NOT NULL"),
        )
        .unwrap();
    assert_eq!(narrow.result_type, TypeDescriptor::decimal(19, 10));
}

#[test]
fn unbounded_precision_saturates_instead_of_overflowing() {
    let config = TypeSystemConfig {
        max_numeric_precision: u32::MAX,
        max_numeric_scale: u32::MAX,
        ..TypeSystemConfig::default()
    };
    let factory = SqlTypeFactory::new(config).unwrap();
    let huge = parse_type("DECIMAL(3000000000, 0) NOT NULL", &factory).unwrap();
    let coercer = StatementCoercer::with_factory(factory);

    let product = coercer.arithmetic(ArithmeticOp::Multiply, &huge, &huge).unwrap();
    assert_eq!(product.result_type, TypeDescriptor::decimal(u32::MAX, 0));
    let sum = coercer.arithmetic(ArithmeticOp::Plus, &huge, &huge).unwrap();
    assert_eq!(sum.result_type, TypeDescriptor::decimal(3_000_000_001, 0));
}

#[test]
fn invalid_configuration_is_a_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "max_numeric_precision": 10 }}"#).unwrap();
    let err: SqlError = TypeSystemConfig::from_file(file.path()).unwrap_err().into();
    assert!(err.code().is_config_error());
    assert!(matches!(err, SqlError::Config { .. }));
}

#[test]
fn insert_into_declared_table() {
    let orders = TableDef::new("orders")
        .with_column(ColumnDef::new("id", ty("INTEGER NOT NULL")))
        .with_column(ColumnDef::new("amount", ty("DECIMAL(10, 2)")))
        .with_column(ColumnDef::new("note", ty("VARCHAR(200)")))
        .with_column(ColumnDef::new("placed", ty("TIMESTAMP NOT NULL")).with_default());

    let source: Vec<TypeDescriptor> = ["SMALLINT NOT NULL", "INTEGER NOT NULL", "CHAR(3) NOT NULL", "DATE NOT NULL"]
        .into_iter()
        .map(ty)
        .collect();
    let result = StatementCoercer::new().insert(&orders, None, &source).unwrap();

    assert_snapshot!(result.row_type.full_type_string(), @"ROW(id INTEGER NOT NULL, amount DECIMAL(10, 2), note VARCHAR(200), placed TIMESTAMP(0) NOT NULL) NOT NULL");
    assert_snapshot!(render_casts(&result.casts), @r"
    column 0: CAST(SMALLINT NOT NULL AS INTEGER NOT NULL)
    column 1: CAST(INTEGER NOT NULL AS DECIMAL(10, 2) NOT NULL)
    column 2: CAST(CHAR(3) NOT NULL AS VARCHAR(200) NOT NULL)
    column 3: CAST(DATE NOT NULL AS TIMESTAMP(0) NOT NULL)
    ");

    let err = StatementCoercer::new()
        .insert(&orders, Some(&["amount", "note"]), &source[1..3])
        .unwrap_err();
    assert_snapshot!(SqlError::from(err).to_diagnostic().to_string(), @"error: SQC0204 - Column 'id' has no default value and does not allow NULLs (List the column in the INSERT or declare a default)");
}

#[test]
fn rejected_union_renders_a_diagnostic() {
    let err = StatementCoercer::new()
        .set_operation(
            SetOperator::Union,
            &[ty("ROW(a BOOLEAN NOT NULL) NOT NULL"), ty("ROW(b DATE NOT NULL) NOT NULL")],
        )
        .unwrap_err();
    let diagnostic = SqlError::from(err).to_diagnostic();
    assert_snapshot!(diagnostic.to_string(), @"error: SQC0103 - Type mismatch in column 0 ('a') of set operation: BOOLEAN NOT NULL, DATE NOT NULL");
    assert_eq!(diagnostic.related[0].subject.as_deref(), Some("a"));
}

#[test]
fn malformed_type_name_renders_a_diagnostic() {
    let err: SqlError = parse_type("DECIMAL(5, 2", &SqlTypeFactory::default())
        .unwrap_err()
        .into();
    assert_eq!(err.code(), sqlcoerce::diagnostics::SQC0300);
    assert!(err.code().is_parse_error());
}

fn canonical_type() -> impl Strategy<Value = TypeDescriptor> {
    let atomic = prop_oneof![
        Just(TypeDescriptor::boolean()),
        prop::sample::select(vec![
            IntegerKind::TinyInt,
            IntegerKind::SmallInt,
            IntegerKind::Int,
            IntegerKind::BigInt,
        ])
        .prop_map(TypeDescriptor::integer_kind),
        (1u32..=19)
            .prop_flat_map(|p| (Just(p), 0..=p))
            .prop_map(|(p, s)| TypeDescriptor::decimal(p, s)),
        Just(TypeDescriptor::float()),
        Just(TypeDescriptor::double()),
        (1u32..=65536).prop_map(TypeDescriptor::char),
        proptest::option::of(1u32..=65536).prop_map(TypeDescriptor::varchar),
        (1u32..=65536).prop_map(TypeDescriptor::binary),
        proptest::option::of(1u32..=65536).prop_map(TypeDescriptor::varbinary),
        Just(TypeDescriptor::date()),
        Just(TypeDescriptor::time()),
        Just(TypeDescriptor::timestamp()),
        Just(TypeDescriptor::timestamp_with_local_time_zone()),
        Just(TypeDescriptor::interval(TimeUnit::Year, TimeUnit::Month)),
        Just(TypeDescriptor::interval(TimeUnit::Hour, TimeUnit::Second)),
    ];
    let atomic = (atomic, any::<bool>()).prop_map(|(t, nullable)| t.with_nullable(nullable));
    atomic.prop_recursive(2, 8, 3, |inner| {
        let composite = prop_oneof![
            inner.clone().prop_map(TypeDescriptor::array),
            (inner.clone(), inner.clone()).prop_map(|(k, v)| TypeDescriptor::map(k, v)),
            prop::collection::vec(inner, 0..3).prop_map(|types| {
                TypeDescriptor::row(
                    types
                        .into_iter()
                        .enumerate()
                        .map(|(i, t)| RowField::new(format!("f{}", i), t))
                        .collect(),
                )
            }),
        ];
        (composite, any::<bool>()).prop_map(|(t, nullable)| t.with_nullable(nullable))
    })
}

proptest! {
    #[test]
    fn rendered_types_parse_back(t in canonical_type()) {
        let parsed = parse_type(&t.full_type_string(), &SqlTypeFactory::default());
        prop_assert_eq!(parsed, Ok(t));
    }
}
