//! CLI functionality for the sqlcoerce tool
//!
//! Subcommands read type names in their rendered form, run one resolver or
//! call site, and report the resulting type together with any casts.

pub mod output;

use crate::parse::{parse_family, parse_type};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use sqlcoerce_diagnostics::SqlError;
use sqlcoerce_types::{SqlTypeFactory, TypeDescriptor, TypeFactory, TypeFamily, TypeSystemConfig};
use sqlcoerce_validate::{ArithmeticOp, ComparisonOp, ImplicitCast, SetOperator, StatementCoercer};
use std::path::Path;

/// Subcommands of the `sqlcoerce` tool
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Tightest common type of two types
    Common { left: String, right: String },

    /// Wider type of a list of types
    Wider {
        #[arg(required = true)]
        types: Vec<String>,

        /// Allow atomic types to promote to VARCHAR against a character type
        #[arg(long)]
        promote_strings: bool,
    },

    /// Target type of an implicit cast into a family
    Cast { source: String, family: String },

    /// Families a type belongs to, primary family first
    Families { ty: String },

    /// Reconcile the row types of UNION branches
    Union {
        #[arg(required = true)]
        rows: Vec<String>,
    },

    /// Coerce the operands of a comparison
    Compare {
        #[arg(value_enum)]
        op: ComparisonArg,
        left: String,
        right: String,
    },

    /// Coerce the operands of an arithmetic operator
    Arithmetic {
        #[arg(value_enum)]
        op: ArithmeticArg,
        left: String,
        right: String,
    },
}

/// Arithmetic operator names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArithmeticArg {
    Plus,
    Minus,
    Times,
    Divide,
    Mod,
}

impl From<ArithmeticArg> for ArithmeticOp {
    fn from(arg: ArithmeticArg) -> Self {
        match arg {
            ArithmeticArg::Plus => Self::Plus,
            ArithmeticArg::Minus => Self::Minus,
            ArithmeticArg::Times => Self::Multiply,
            ArithmeticArg::Divide => Self::Divide,
            ArithmeticArg::Mod => Self::Mod,
        }
    }
}

/// Comparison operator names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComparisonArg {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    IsDistinctFrom,
    IsNotDistinctFrom,
}

impl From<ComparisonArg> for ComparisonOp {
    fn from(arg: ComparisonArg) -> Self {
        match arg {
            ComparisonArg::Eq => Self::Equals,
            ComparisonArg::Ne => Self::NotEquals,
            ComparisonArg::Lt => Self::LessThan,
            ComparisonArg::Le => Self::LessThanOrEqual,
            ComparisonArg::Gt => Self::GreaterThan,
            ComparisonArg::Ge => Self::GreaterThanOrEqual,
            ComparisonArg::IsDistinctFrom => Self::IsDistinctFrom,
            ComparisonArg::IsNotDistinctFrom => Self::IsNotDistinctFrom,
        }
    }
}

/// Result of one subcommand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub command: &'static str,
    /// Input types after parsing
    pub inputs: Vec<TypeDescriptor>,
    /// Resolved type; `None` when the resolver found no type
    pub result: Option<TypeDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub families: Vec<TypeFamily>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub casts: Vec<ImplicitCast>,
}

impl Outcome {
    fn new(command: &'static str, inputs: Vec<TypeDescriptor>) -> Self {
        Self {
            command,
            inputs,
            result: None,
            families: Vec::new(),
            casts: Vec::new(),
        }
    }
}

/// Build the statement coercer, from a configuration file if one is given
pub fn load_coercer(config: Option<&Path>) -> Result<StatementCoercer, SqlError> {
    let config = match config {
        Some(path) => TypeSystemConfig::from_file(path)?,
        None => TypeSystemConfig::default(),
    };
    Ok(StatementCoercer::with_factory(SqlTypeFactory::new(config)?))
}

/// Run one subcommand
pub fn execute<F: TypeFactory>(coercer: &StatementCoercer<F>, command: &Command) -> Result<Outcome, SqlError> {
    let factory = coercer.coercer().factory();
    let parse_all = |names: &[String]| -> Result<Vec<TypeDescriptor>, SqlError> {
        names
            .iter()
            .map(|name| parse_type(name, factory).map_err(SqlError::from))
            .collect()
    };

    let outcome = match command {
        Command::Common { left, right } => {
            let inputs = parse_all(&[left.clone(), right.clone()])?;
            let mut outcome = Outcome::new("common", inputs);
            outcome.result = coercer.coercer().tightest_common_type(&outcome.inputs[0], &outcome.inputs[1]);
            outcome
        }
        Command::Wider { types, promote_strings } => {
            let mut outcome = Outcome::new("wider", parse_all(types)?);
            outcome.result = coercer.coercer().wider_type_for(&outcome.inputs, *promote_strings);
            outcome
        }
        Command::Cast { source, family } => {
            let family = parse_family(family)?;
            let mut outcome = Outcome::new("cast", parse_all(std::slice::from_ref(source))?);
            outcome.result = coercer.coercer().implicit_cast(&outcome.inputs[0], family);
            outcome
        }
        Command::Families { ty } => {
            let mut outcome = Outcome::new("families", parse_all(std::slice::from_ref(ty))?);
            outcome.families = outcome.inputs[0].families().to_vec();
            outcome
        }
        Command::Union { rows } => {
            let mut outcome = Outcome::new("union", parse_all(rows)?);
            let coercion = coercer.set_operation(SetOperator::Union, &outcome.inputs)?;
            outcome.result = Some(coercion.row_type);
            outcome.casts = coercion.casts;
            outcome
        }
        Command::Compare { op, left, right } => {
            let inputs = parse_all(&[left.clone(), right.clone()])?;
            let coercion = coercer.comparison((*op).into(), &inputs[0], &inputs[1])?;
            let mut outcome = Outcome::new("compare", inputs);
            outcome.result = Some(coercion.result_type);
            outcome.casts = coercion.casts;
            outcome
        }
        Command::Arithmetic { op, left, right } => {
            let inputs = parse_all(&[left.clone(), right.clone()])?;
            let coercion = coercer.arithmetic((*op).into(), &inputs[0], &inputs[1])?;
            let mut outcome = Outcome::new("arithmetic", inputs);
            outcome.result = Some(coercion.result_type);
            outcome.casts = coercion.casts;
            outcome
        }
    };
    Ok(outcome)
}
