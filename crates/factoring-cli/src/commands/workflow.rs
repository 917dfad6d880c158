use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use factoring_core::types::InvoiceDraft;
use factoring_core::workflow;

use crate::input;
use crate::store::JsonStore;

/// Arguments for booking an invoice
#[derive(Args)]
pub struct BookArgs {
    /// Path to the JSON store; updated in place when the booking succeeds
    #[arg(long)]
    pub store: String,

    /// Path to a JSON invoice draft (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Invoice number
    #[arg(long)]
    pub number: Option<String>,

    /// Originating client
    #[arg(long)]
    pub client_id: Option<u64>,

    /// Invoice principal
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Issue date (YYYY-MM-DD)
    #[arg(long)]
    pub issue: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Annual discount rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,
}

pub fn run_book(args: BookArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let draft: InvoiceDraft = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        InvoiceDraft {
            invoice_number: args
                .number
                .ok_or("--number is required (or provide --input)")?,
            client_id: args
                .client_id
                .ok_or("--client-id is required (or provide --input)")?,
            amount: args
                .amount
                .ok_or("--amount is required (or provide --input)")?,
            issue_date: args
                .issue
                .ok_or("--issue is required (or provide --input)")?,
            due_date: args.due.ok_or("--due is required (or provide --input)")?,
            discount_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
        }
    };

    let mut store = JsonStore::open(&args.store)?;
    let outcome = workflow::book_invoice(&mut store, &draft)?;
    Ok(serde_json::to_value(outcome)?)
}
