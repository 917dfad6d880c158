use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use super::alerts::{alert_level, utilization_percent, AlertLevel};
use crate::{types::*, FactoringError, FactoringResult};

// ---------------------------------------------------------------------------
// Credit arithmetic
// ---------------------------------------------------------------------------

/// Credit currently tied up by a client: the sum over its Pending and
/// Approved invoices. Rejected and Paid invoices are excluded.
pub fn utilized_credit(client_id: u64, invoices: &[Invoice]) -> Money {
    invoices
        .iter()
        .filter(|inv| inv.client_id == client_id && inv.status.counts_toward_credit())
        .map(|inv| inv.amount)
        .sum()
}

/// Headroom left on the client's credit line. Unlimited when no line is
/// set; otherwise line minus utilized, which may be negative.
pub fn available_credit(client: &Client, invoices: &[Invoice]) -> AvailableCredit {
    match client.credit_ceiling() {
        None => AvailableCredit::Unlimited,
        Some(line) => AvailableCredit::Limited(line - utilized_credit(client.id, invoices)),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Why a candidate amount was declined. A rejection is an expected
/// business outcome the caller branches on, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason")]
pub enum RejectionReason {
    /// Candidate amount exceeds the client's single-invoice ceiling.
    PerInvoiceLimitExceeded { limit: Money },
    /// Candidate amount would push utilization past the credit line.
    /// `available` may be negative when the line is already over-utilized.
    CreditLineExceeded { available: Money },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::PerInvoiceLimitExceeded { limit } => {
                write!(f, "Amount exceeds the per-invoice limit of {limit}")
            }
            RejectionReason::CreditLineExceeded { available } => {
                write!(f, "Insufficient credit. Available: {available}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "detail")]
pub enum CreditDecision {
    Approved,
    Rejected(RejectionReason),
}

impl CreditDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, CreditDecision::Approved)
    }
}

/// Decide whether a candidate invoice amount may be booked against the
/// client's credit profile. The per-invoice cap is checked before the
/// aggregate line so the caller surfaces the more specific failure first.
pub fn validate(client: &Client, candidate: Money, invoices: &[Invoice]) -> CreditDecision {
    if let Some(limit) = client.invoice_ceiling() {
        if candidate > limit {
            return CreditDecision::Rejected(RejectionReason::PerInvoiceLimitExceeded { limit });
        }
    }

    if let AvailableCredit::Limited(available) = available_credit(client, invoices) {
        if candidate > available {
            return CreditDecision::Rejected(RejectionReason::CreditLineExceeded { available });
        }
    }

    CreditDecision::Approved
}

// ---------------------------------------------------------------------------
// Check operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCheckInput {
    pub client: Client,
    pub candidate_amount: Money,
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCheckOutput {
    pub decision: CreditDecision,
    pub utilized: Money,
    pub available: AvailableCredit,
    /// Current utilization, before the candidate amount. Unclamped.
    pub utilization_pct: Decimal,
    pub alert: AlertLevel,
}

/// Full credit picture for a candidate invoice: the decision plus the
/// utilization figures the front end displays next to it.
pub fn check_credit(
    input: &CreditCheckInput,
) -> FactoringResult<ComputationOutput<CreditCheckOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.candidate_amount <= Decimal::ZERO {
        return Err(FactoringError::InvalidInput {
            field: "candidate_amount".into(),
            reason: "Candidate amount must be positive.".into(),
        });
    }

    let utilized = utilized_credit(input.client.id, &input.invoices);
    let available = available_credit(&input.client, &input.invoices);
    let utilization_pct = utilization_percent(&input.client, &input.invoices);
    let alert = alert_level(utilization_pct);
    let decision = validate(&input.client, input.candidate_amount, &input.invoices);

    if alert >= AlertLevel::High {
        warnings.push(format!(
            "Client '{}' is already at {utilization_pct}% of its credit line.",
            input.client.name
        ));
    }

    let output = CreditCheckOutput {
        decision,
        utilized,
        available,
        utilization_pct,
        alert,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "counted_states": "Pending, Approved",
        "check_order": "per-invoice limit before credit line",
    });

    Ok(with_metadata(
        "Credit Line Validation",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn client(credit_line: Option<Decimal>, invoice_limit: Option<Decimal>) -> Client {
        Client {
            id: 7,
            name: "Agroexportadora del Sur".into(),
            document_kind: DocumentKind::Ruc,
            document: "20123456786".into(),
            credit_line,
            invoice_limit,
            status: ClientStatus::Active,
            kind: ClientKind::Client,
            email: None,
            phone: None,
        }
    }

    fn invoice(id: u64, client_id: u64, amount: Decimal, status: InvoiceStatus) -> Invoice {
        Invoice {
            id,
            invoice_number: format!("F001-{id:05}"),
            client_id,
            amount,
            issue_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            due_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            discount_rate: dec!(12),
            status,
        }
    }

    #[test]
    fn test_utilized_credit_sums_pending_and_approved_only() {
        let invoices = vec![
            invoice(1, 7, dec!(20_000), InvoiceStatus::Pending),
            invoice(2, 7, dec!(40_000), InvoiceStatus::Approved),
            invoice(3, 7, dec!(500_000), InvoiceStatus::Rejected),
            invoice(4, 7, dec!(300_000), InvoiceStatus::Paid),
            invoice(5, 99, dec!(10_000), InvoiceStatus::Pending), // other client
        ];
        assert_eq!(utilized_credit(7, &invoices), dec!(60_000));
    }

    #[test]
    fn test_available_credit_unlimited_without_line() {
        let invoices = vec![invoice(1, 7, dec!(1_000_000), InvoiceStatus::Pending)];
        assert_eq!(
            available_credit(&client(None, None), &invoices),
            AvailableCredit::Unlimited
        );
        assert_eq!(
            available_credit(&client(Some(Decimal::ZERO), None), &invoices),
            AvailableCredit::Unlimited
        );
    }

    #[test]
    fn test_available_credit_may_go_negative() {
        let invoices = vec![invoice(1, 7, dec!(120_000), InvoiceStatus::Approved)];
        assert_eq!(
            available_credit(&client(Some(dec!(100_000)), None), &invoices),
            AvailableCredit::Limited(dec!(-20_000))
        );
    }

    #[test]
    fn test_per_invoice_limit_boundary() {
        let c = client(None, Some(dec!(50_000)));
        assert_eq!(validate(&c, dec!(50_000), &[]), CreditDecision::Approved);
        assert_eq!(
            validate(&c, dec!(50_001), &[]),
            CreditDecision::Rejected(RejectionReason::PerInvoiceLimitExceeded {
                limit: dec!(50_000)
            })
        );
    }

    #[test]
    fn test_credit_line_aggregation_boundary() {
        let c = client(Some(dec!(100_000)), None);
        let invoices = vec![
            invoice(1, 7, dec!(25_000), InvoiceStatus::Pending),
            invoice(2, 7, dec!(35_000), InvoiceStatus::Approved),
        ];
        // utilized 60_000, available 40_000
        assert_eq!(validate(&c, dec!(40_000), &invoices), CreditDecision::Approved);
        assert_eq!(
            validate(&c, dec!(41_000), &invoices),
            CreditDecision::Rejected(RejectionReason::CreditLineExceeded {
                available: dec!(40_000)
            })
        );
    }

    #[test]
    fn test_settled_invoices_do_not_consume_the_line() {
        let c = client(Some(dec!(100_000)), None);
        let invoices = vec![
            invoice(1, 7, dec!(90_000), InvoiceStatus::Paid),
            invoice(2, 7, dec!(90_000), InvoiceStatus::Rejected),
        ];
        assert_eq!(validate(&c, dec!(100_000), &invoices), CreditDecision::Approved);
    }

    #[test]
    fn test_per_invoice_cap_checked_before_the_line() {
        // Amount breaches both limits; the more specific failure wins.
        let c = client(Some(dec!(10_000)), Some(dec!(5_000)));
        let invoices = vec![invoice(1, 7, dec!(9_000), InvoiceStatus::Pending)];
        assert_eq!(
            validate(&c, dec!(6_000), &invoices),
            CreditDecision::Rejected(RejectionReason::PerInvoiceLimitExceeded {
                limit: dec!(5_000)
            })
        );
    }

    #[test]
    fn test_unlimited_line_never_fails_the_line_check() {
        let c = client(None, Some(dec!(50_000)));
        assert_eq!(
            validate(&c, dec!(50_000), &[invoice(1, 7, dec!(900_000), InvoiceStatus::Approved)]),
            CreditDecision::Approved
        );
    }

    #[test]
    fn test_rejection_messages_carry_detail() {
        let per_invoice = RejectionReason::PerInvoiceLimitExceeded { limit: dec!(50_000) };
        assert_eq!(
            per_invoice.to_string(),
            "Amount exceeds the per-invoice limit of 50000"
        );
        let line = RejectionReason::CreditLineExceeded { available: dec!(-20_000) };
        assert_eq!(line.to_string(), "Insufficient credit. Available: -20000");
    }

    #[test]
    fn test_check_credit_envelope() {
        let c = client(Some(dec!(100_000)), None);
        let input = CreditCheckInput {
            client: c,
            candidate_amount: dec!(10_000),
            invoices: vec![invoice(1, 7, dec!(85_000), InvoiceStatus::Approved)],
        };
        let result = check_credit(&input).unwrap();
        let out = &result.result;
        assert!(!out.decision.is_approved());
        assert_eq!(out.utilized, dec!(85_000));
        assert_eq!(out.available, AvailableCredit::Limited(dec!(15_000)));
        assert_eq!(out.utilization_pct, dec!(85));
        assert_eq!(out.alert, AlertLevel::High);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_check_credit_rejects_non_positive_amount() {
        let input = CreditCheckInput {
            client: client(None, None),
            candidate_amount: Decimal::ZERO,
            invoices: vec![],
        };
        let err = check_credit(&input).unwrap_err();
        match err {
            FactoringError::InvalidInput { field, .. } => assert_eq!(field, "candidate_amount"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_decision_serializes_with_reason_tag() {
        let decision = CreditDecision::Rejected(RejectionReason::CreditLineExceeded {
            available: dec!(40_000),
        });
        let value = serde_json::to_value(&decision).unwrap();
        assert_eq!(value["decision"], "Rejected");
        assert_eq!(value["detail"]["reason"], "CreditLineExceeded");
        assert_eq!(value["detail"]["available"], "40000");
    }
}
