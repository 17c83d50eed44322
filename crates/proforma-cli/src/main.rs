mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::deal::{AnalyzeArgs, ValidateArgs};
use commands::mortgage::LoanBalanceArgs;

/// Rental property deal analysis
#[derive(Parser)]
#[command(
    name = "proforma",
    version,
    about = "Rental property deal analysis",
    long_about = "Analyze rental property acquisitions: income and expense roll-ups, \
                  financing and amortization, year-by-year cash-flow projections, and \
                  exit economics. Accepts a JSON/YAML input file, piped JSON, or \
                  individual flags."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full deal analysis (metrics, projections, exit economics)
    Analyze(AnalyzeArgs),
    /// Check a raw deal input against the schema without analyzing it
    Validate(ValidateArgs),
    /// Query the amortization schedule of a fixed-rate loan
    LoanBalance(LoanBalanceArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::deal::run_analyze(args),
        Commands::Validate(args) => commands::deal::run_validate(args),
        Commands::LoanBalance(args) => commands::mortgage::run_loan_balance(args),
        Commands::Version => {
            println!("proforma {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
