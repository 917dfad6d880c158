use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use factoring_core::financing::{self, FinancingQuoteInput};

use crate::input;

/// Arguments for the financing quote
#[derive(Args)]
pub struct QuoteArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Invoice principal
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Annual discount rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Issue date (YYYY-MM-DD)
    #[arg(long)]
    pub issue: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

pub fn run_quote(args: QuoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let quote_input: FinancingQuoteInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        FinancingQuoteInput {
            amount: args
                .amount
                .ok_or("--amount is required (or provide --input)")?,
            discount_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            issue_date: financing::parse_date(
                args.issue
                    .as_deref()
                    .ok_or("--issue is required (or provide --input)")?,
            )?,
            due_date: financing::parse_date(
                args.due
                    .as_deref()
                    .ok_or("--due is required (or provide --input)")?,
            )?,
        }
    };

    let result = financing::financing_quote(&quote_input)?;
    Ok(serde_json::to_value(result)?)
}
