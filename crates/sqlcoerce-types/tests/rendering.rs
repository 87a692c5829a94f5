//! Snapshot tests for canonical type rendering

use insta::assert_snapshot;
use sqlcoerce_types::*;

fn render_all(types: &[TypeDescriptor]) -> String {
    types
        .iter()
        .map(|t| t.full_type_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn snapshot_atomic_types() {
    let categories = TypeCategories::new(&SqlTypeFactory::default());
    assert_snapshot!(render_all(&categories.atomic_types), @r"
    DATE NOT NULL
    TIME(0) NOT NULL
    TIMESTAMP(0) NOT NULL
    TIMESTAMP_WITH_LOCAL_TIME_ZONE(0) NOT NULL
    TINYINT NOT NULL
    SMALLINT NOT NULL
    INTEGER NOT NULL
    BIGINT NOT NULL
    DECIMAL(19, 0) NOT NULL
    FLOAT NOT NULL
    DOUBLE NOT NULL
    CHAR(1) NOT NULL
    VARCHAR NOT NULL
    BINARY(1) NOT NULL
    VARBINARY NOT NULL
    BOOLEAN NOT NULL
    ");
}

#[test]
fn snapshot_complex_types() {
    let categories = TypeCategories::new(&SqlTypeFactory::default());
    assert_snapshot!(render_all(&categories.complex_types), @r"
    INTEGER NOT NULL ARRAY NOT NULL
    VARCHAR NOT NULL ARRAY NOT NULL
    (VARCHAR NOT NULL, VARCHAR NOT NULL) MAP NOT NULL
    ROW(a1 VARCHAR NOT NULL) NOT NULL
    ROW(a1 VARBINARY NOT NULL, a2 INTEGER NOT NULL) NOT NULL
    ");
}

#[test]
fn snapshot_type_names() {
    let types = [
        TypeDescriptor::null(),
        TypeDescriptor::decimal(10, 4).with_nullable(true),
        TypeDescriptor::varchar(Some(20)),
        TypeDescriptor::interval(TimeUnit::Day, TimeUnit::Minute),
        TypeDescriptor::interval(TimeUnit::Year, TimeUnit::Year),
        TypeDescriptor::array(TypeDescriptor::integer().with_nullable(true)),
        TypeDescriptor::map(TypeDescriptor::varchar(None), TypeDescriptor::bigint()),
    ];
    let names: Vec<String> = types.iter().map(|t| t.type_name()).collect();
    assert_snapshot!(names.join("\n"), @r"
    NULL
    DECIMAL(10, 4)
    VARCHAR(20)
    INTERVAL DAY TO MINUTE
    INTERVAL YEAR
    INTEGER ARRAY
    (VARCHAR, BIGINT) MAP
    ");
}

#[test]
fn snapshot_type_errors() {
    let factory = SqlTypeFactory::default();
    let errors = [
        factory.create_decimal(0, 0).unwrap_err(),
        factory.create_decimal(3, 5).unwrap_err(),
        factory.create_with_length(ScalarKind::VarChar, 70000).unwrap_err(),
        factory.create_interval(TimeUnit::Month, TimeUnit::Day).unwrap_err(),
    ];
    let rendered: Vec<String> = errors
        .iter()
        .map(|e| format!("{}: {}", e.code(), e))
        .collect();
    assert_snapshot!(rendered.join("\n"), @r"
    SQC0001: DECIMAL precision must be at least 1, got 0
    SQC0002: DECIMAL scale 5 exceeds precision 3
    SQC0003: Length 70000 of VARCHAR must be between 1 and 65536
    SQC0004: Invalid interval qualifier MONTH TO DAY
    ");
}
