//! Output formatting utilities

use super::Outcome;
use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use sqlcoerce_diagnostics::SqlError;
use std::io::IsTerminal;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// Set up color output based on user preference
pub fn setup_colors(mode: ColorMode) {
    let enabled = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stderr().is_terminal(),
    };
    colored::control::set_override(enabled);
}

/// Format an error for display
///
/// Coercion, parse and configuration failures render as diagnostics with
/// their code and help text.
pub fn format_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<SqlError>() {
        Some(err) => err.to_diagnostic().to_colored_string(),
        None => format!("{} {:#}", "Error:".red().bold(), error),
    }
}

/// Render an outcome as plain text
///
/// The first line is the resolved type (or the family list); casts follow,
/// one per line. With `verbose` the parsed inputs come first.
pub fn format_text(outcome: &Outcome, verbose: bool) -> String {
    let mut lines = Vec::new();
    if verbose {
        for (i, input) in outcome.inputs.iter().enumerate() {
            lines.push(format!("{} {}", format!("input {}:", i).dimmed(), input));
        }
    }
    if outcome.command == "families" {
        let names: Vec<&str> = outcome.families.iter().map(|f| f.name()).collect();
        lines.push(if names.is_empty() {
            "none".yellow().to_string()
        } else {
            names.join(", ")
        });
    } else {
        lines.push(match &outcome.result {
            Some(ty) => ty.full_type_string().green().to_string(),
            None => "none".yellow().to_string(),
        });
    }
    for cast in &outcome.casts {
        lines.push(format!("  {}", cast));
    }
    lines.join("\n")
}

/// Render an outcome in the requested format
pub fn format_outcome(outcome: &Outcome, format: OutputFormat, verbose: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(outcome, verbose)),
        OutputFormat::Json => serde_json::to_string_pretty(outcome).context("Failed to serialize JSON"),
    }
}
