use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::{types::*, FactoringError, FactoringResult};

/// Commercial-year basis used across the factoring market (not 365).
const COMMERCIAL_YEAR_DAYS: Decimal = dec!(360);

const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Pure calculation primitives
// ---------------------------------------------------------------------------

/// Parse an ISO-8601 calendar date (YYYY-MM-DD, no time component).
pub fn parse_date(raw: &str) -> FactoringResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| FactoringError::InvalidDate(raw.to_string()))
}

/// Calendar days from issue to due date. Negative when the dates are
/// supplied out of order; callers reject that before quoting, this
/// function does not correct it.
pub fn financing_days(issue: NaiveDate, due: NaiveDate) -> i64 {
    (due - issue).num_days()
}

/// Day count over ISO-8601 date strings.
pub fn days_between(issue: &str, due: &str) -> FactoringResult<i64> {
    Ok(financing_days(parse_date(issue)?, parse_date(due)?))
}

/// Discount withheld by the financier:
/// principal * rate/100 * days/360.
pub fn discount_amount(principal: Money, annual_rate_pct: Rate, days: i64) -> Money {
    principal * (annual_rate_pct / HUNDRED) * (Decimal::from(days) / COMMERCIAL_YEAR_DAYS)
}

/// Net payout to the client after the discount.
pub fn net_payout(principal: Money, annual_rate_pct: Rate, days: i64) -> Money {
    principal - discount_amount(principal, annual_rate_pct, days)
}

// ---------------------------------------------------------------------------
// Quote operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingQuoteInput {
    pub amount: Money,
    /// Annual discount rate in percent.
    pub discount_rate: Rate,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingQuoteOutput {
    pub financing_days: i64,
    pub discount: Money,
    pub net_payout: Money,
    /// Discount as a percentage of the principal over the actual period.
    pub period_cost_pct: Rate,
}

/// Produce the display figures for a candidate invoice: day count,
/// discount, and net payout on the 360-day commercial basis.
pub fn financing_quote(
    input: &FinancingQuoteInput,
) -> FactoringResult<ComputationOutput<FinancingQuoteOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let days = financing_days(input.issue_date, input.due_date);
    if Decimal::from(days) > COMMERCIAL_YEAR_DAYS {
        warnings.push(format!(
            "Financing period of {days} days exceeds one commercial year (360 days)."
        ));
    }

    let discount = discount_amount(input.amount, input.discount_rate, days);
    let period_cost_pct = if input.amount.is_zero() {
        Decimal::ZERO
    } else {
        discount / input.amount * HUNDRED
    };

    let output = FinancingQuoteOutput {
        financing_days: days,
        discount,
        net_payout: input.amount - discount,
        period_cost_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "day_basis": COMMERCIAL_YEAR_DAYS.to_string(),
        "rate_quoted": "annual_percent",
    });

    Ok(with_metadata(
        "Commercial Discount Quote (360-day basis)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &FinancingQuoteInput) -> FactoringResult<()> {
    if input.amount <= Decimal::ZERO {
        return Err(FactoringError::InvalidInput {
            field: "amount".into(),
            reason: "Principal must be positive.".into(),
        });
    }
    if input.discount_rate < Decimal::ZERO || input.discount_rate > HUNDRED {
        return Err(FactoringError::InvalidInput {
            field: "discount_rate".into(),
            reason: "Annual discount rate must be between 0 and 100 percent.".into(),
        });
    }
    if input.due_date <= input.issue_date {
        return Err(FactoringError::InvalidInput {
            field: "due_date".into(),
            reason: "Due date must be strictly after the issue date.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
