mod commands;
mod input;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::credit::{CreditCheckArgs, NearLimitArgs, UtilizationArgs};
use commands::documents::CheckDocumentArgs;
use commands::financing::QuoteArgs;
use commands::workflow::BookArgs;

/// Factoring credit-control and discount calculations
#[derive(Parser)]
#[command(
    name = "facto",
    version,
    about = "Factoring credit-control and discount calculations",
    long_about = "A CLI for factoring (invoice discounting) operations with decimal \
                  precision. Computes financing quotes on the 360-day commercial \
                  basis, validates candidate invoices against client credit lines, \
                  reports credit-line utilization, and books invoices into a JSON \
                  store."
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
    /// Compute a financing quote (day count, discount, net payout)
    Quote(QuoteArgs),
    /// Validate a candidate amount against a client's credit profile
    CreditCheck(CreditCheckArgs),
    /// Report credit-line utilization for every client with a line
    Utilization(UtilizationArgs),
    /// List clients at or over a utilization threshold
    NearLimit(NearLimitArgs),
    /// Book a new invoice into the store
    Book(BookArgs),
    /// Validate an identity document number (RUC, DNI, CE, passport)
    CheckDocument(CheckDocumentArgs),
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
        Commands::Quote(args) => commands::financing::run_quote(args),
        Commands::CreditCheck(args) => commands::credit::run_credit_check(args),
        Commands::Utilization(args) => commands::credit::run_utilization(args),
        Commands::NearLimit(args) => commands::credit::run_near_limit(args),
        Commands::Book(args) => commands::workflow::run_book(args),
        Commands::CheckDocument(args) => commands::documents::run_check_document(args),
        Commands::Version => {
            println!("facto {}", env!("CARGO_PKG_VERSION"));
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
