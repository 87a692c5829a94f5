//! sqlcoerce command-line interface

use anyhow::Result;
use clap::Parser;
use sqlcoerce::cli::output::{self, ColorMode, OutputFormat};
use sqlcoerce::cli::{self, Command};
use std::path::PathBuf;
use std::process;

/// SQL implicit type coercion tool
#[derive(Parser)]
#[command(name = "sqlcoerce")]
#[command(author, version, about = "Resolve SQL types the way a validator coerces them", long_about = None)]
struct Cli {
    /// Print the parsed input types
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Type system configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    output::setup_colors(cli.color);

    if let Err(err) = run(&cli) {
        eprintln!("{}", output::format_error(&err));
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let coercer = cli::load_coercer(cli.config.as_deref())?;
    let outcome = cli::execute(&coercer, &cli.command)?;
    println!("{}", output::format_outcome(&outcome, cli.format, cli.verbose)?);
    Ok(())
}
