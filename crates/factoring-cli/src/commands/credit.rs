use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use factoring_core::credit::alerts::{self, UtilizationReportInput};
use factoring_core::credit::limits::{self, CreditCheckInput};
use factoring_core::repository::FactoringStore;

use crate::store::JsonStore;

/// Arguments for the credit check
#[derive(Args)]
pub struct CreditCheckArgs {
    /// Path to the JSON store ({"clients": [...], "invoices": [...]})
    #[arg(long)]
    pub store: String,

    /// Client to check
    #[arg(long)]
    pub client_id: u64,

    /// Candidate invoice amount
    #[arg(long)]
    pub amount: Decimal,
}

pub fn run_credit_check(args: CreditCheckArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let store = JsonStore::open(&args.store)?;
    let client = store
        .load_clients()?
        .into_iter()
        .find(|c| c.id == args.client_id)
        .ok_or_else(|| format!("No client with id {} in the store", args.client_id))?;

    let check_input = CreditCheckInput {
        client,
        candidate_amount: args.amount,
        invoices: store.load_invoices()?,
    };

    let result = limits::check_credit(&check_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the utilization report
#[derive(Args)]
pub struct UtilizationArgs {
    /// Path to the JSON store
    #[arg(long)]
    pub store: String,
}

pub fn run_utilization(args: UtilizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let store = JsonStore::open(&args.store)?;
    let report_input = UtilizationReportInput {
        clients: store.load_clients()?,
        invoices: store.load_invoices()?,
    };

    let result = alerts::utilization_report(&report_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the near-limit watch list
#[derive(Args)]
pub struct NearLimitArgs {
    /// Path to the JSON store
    #[arg(long)]
    pub store: String,

    /// Utilization threshold in percent
    #[arg(long, default_value_t = dec!(80))]
    pub threshold: Decimal,
}

pub fn run_near_limit(args: NearLimitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let store = JsonStore::open(&args.store)?;
    let watched = alerts::clients_near_limit(
        &store.load_clients()?,
        &store.load_invoices()?,
        args.threshold,
    );
    Ok(serde_json::to_value(watched)?)
}
