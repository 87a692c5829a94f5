//! Subcommands of the command-line tool, driven through clap

#![cfg(feature = "cli")]

use clap::Parser;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sqlcoerce::cli::output::{self, OutputFormat};
use sqlcoerce::cli::{self, Command};
use sqlcoerce::diagnostics::{SQC0201, SQC0401};
use std::path::Path;

#[derive(Parser)]
struct Harness {
    #[command(subcommand)]
    command: Command,
}

fn run(args: &[&str]) -> Result<String, sqlcoerce::SqlError> {
    colored::control::set_override(false);
    let harness = Harness::try_parse_from(std::iter::once("sqlcoerce").chain(args.iter().copied())).unwrap();
    let coercer = cli::load_coercer(None)?;
    let outcome = cli::execute(&coercer, &harness.command)?;
    Ok(output::format_text(&outcome, false))
}

#[rstest]
#[case(&["common", "INTEGER NOT NULL", "BIGINT"], "BIGINT")]
#[case(&["common", "BOOLEAN", "DATE"], "none")]
#[case(&["wider", "INTEGER NOT NULL", "VARCHAR(3) NOT NULL"], "none")]
#[case(&["wider", "--promote-strings", "INTEGER NOT NULL", "VARCHAR(3) NOT NULL"], "VARCHAR NOT NULL")]
#[case(&["cast", "CHAR(3)", "integer"], "BIGINT")]
#[case(&["cast", "BOOLEAN NOT NULL", "NUMERIC"], "none")]
#[case(&["families", "DECIMAL(5, 2) NOT NULL"], "NUMERIC, EXACT_NUMERIC, DECIMAL")]
#[case(&["families", "ROW(a INTEGER)"], "none")]
fn test_resolver_commands(#[case] args: &[&str], #[case] expected: &str) {
    assert_eq!(run(args).unwrap(), expected);
}

#[test]
fn test_union_reports_casts() {
    let text = run(&["union", "ROW(x INTEGER NOT NULL) NOT NULL", "ROW(x BIGINT) NOT NULL"]).unwrap();
    assert_snapshot!(text, @r"
    ROW(x BIGINT) NOT NULL
      branch 0 column 0: CAST(INTEGER NOT NULL AS BIGINT NOT NULL)
    ");
}

#[test]
fn test_operator_commands() {
    let text = run(&["compare", "eq", "CHAR(1) NOT NULL", "INTEGER NOT NULL"]).unwrap();
    assert_snapshot!(text, @r"
    BOOLEAN NOT NULL
      operand 0: CAST(CHAR(1) NOT NULL AS INTEGER NOT NULL)
    ");

    let text = run(&["arithmetic", "divide", "DECIMAL(3, 1) NOT NULL", "CHAR(3) NOT NULL"]).unwrap();
    assert_snapshot!(text, @r"
    DECIMAL(19, 0) NOT NULL
      operand 1: CAST(CHAR(3) NOT NULL AS DECIMAL(19, 19) NOT NULL)
    ");
}

#[test]
fn test_json_output() {
    let harness = Harness::try_parse_from(["sqlcoerce", "common", "INTEGER NOT NULL", "BIGINT"]).unwrap();
    let outcome = cli::execute(&cli::load_coercer(None).unwrap(), &harness.command).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&output::format_outcome(&outcome, OutputFormat::Json, false).unwrap()).unwrap();

    assert_eq!(json["command"], "common");
    assert_eq!(json["result"]["nullable"], true);
    assert_eq!(json["result"]["kind"]["type"], "ExactNumeric");
    assert_eq!(json["inputs"].as_array().map(Vec::len), Some(2));
    assert!(json.get("casts").is_none());
}

#[test]
fn test_verbose_lists_inputs() {
    colored::control::set_override(false);
    let harness = Harness::try_parse_from(["sqlcoerce", "cast", "int", "string"]).unwrap();
    let outcome = cli::execute(&cli::load_coercer(None).unwrap(), &harness.command).unwrap();
    assert_snapshot!(output::format_text(&outcome, true), @r"
    input 0: INTEGER
    VARCHAR
    ");
}

#[test]
fn test_rejections_format_as_diagnostics() {
    let err = run(&["union", "ROW(x INTEGER) NOT NULL", "INTEGER NOT NULL"]).unwrap_err();
    assert_eq!(err.code(), SQC0201);
    assert_snapshot!(output::format_error(&anyhow::Error::new(err)), @r"
    error[SQC0201]: Set operator branch 1 has non-row type INTEGER NOT NULL
      note: branch 1: set operation branch
    ");

    let err = run(&["common", "INTEGER", "TEXT"]).unwrap_err();
    assert!(err.code().is_parse_error());
}

#[test]
fn test_missing_config_file() {
    let err = cli::load_coercer(Some(Path::new("/nonexistent/types.json"))).unwrap_err();
    assert_eq!(err.code(), SQC0401);
}
