use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual discount rates in percent as entered on invoices (15 = 15%).
pub type Rate = Decimal;

/// Identity document kinds accepted for clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Ruc,
    Dni,
    ForeignerCard,
    Passport,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientKind {
    /// May originate financable invoices.
    #[default]
    Client,
    /// Counterparty that owes the receivable; cannot originate financing.
    Debtor,
}

/// A party that can receive factoring financing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    pub name: String,
    pub document_kind: DocumentKind,
    pub document: String,
    /// Aggregate ceiling on outstanding financed amount. Absent or zero
    /// means unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_line: Option<Money>,
    /// Ceiling on any single invoice. Absent or zero means unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_limit: Option<Money>,
    pub status: ClientStatus,
    pub kind: ClientKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Client {
    /// Credit line if set and positive; absent or zero means no ceiling.
    pub fn credit_ceiling(&self) -> Option<Money> {
        self.credit_line.filter(|line| *line > Decimal::ZERO)
    }

    /// Per-invoice limit if set and positive.
    pub fn invoice_ceiling(&self) -> Option<Money> {
        self.invoice_limit.filter(|limit| *limit > Decimal::ZERO)
    }

    /// Only active clients of kind Client may originate financing.
    pub fn may_originate(&self) -> bool {
        self.status == ClientStatus::Active && self.kind == ClientKind::Client
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl InvoiceStatus {
    /// Pending and Approved invoices tie up the credit line. Rejected ones
    /// never counted; paid ones are settled and freed.
    pub fn counts_toward_credit(self) -> bool {
        matches!(self, InvoiceStatus::Pending | InvoiceStatus::Approved)
    }
}

/// A financable receivable. Derived figures (day count, discount, net
/// payout) are recomputed on demand, never stored as source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: u64,
    pub invoice_number: String,
    pub client_id: u64,
    pub amount: Money,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Annual discount rate in percent (0-100).
    pub discount_rate: Rate,
    pub status: InvoiceStatus,
}

/// Candidate invoice as captured by the booking workflow, dates still in
/// ISO-8601 string form at this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub invoice_number: String,
    pub client_id: u64,
    pub amount: Money,
    pub issue_date: String,
    pub due_date: String,
    pub discount_rate: Rate,
}

/// Remaining headroom on a credit line. `Limited` may be negative when the
/// line is already over-utilized; it is deliberately not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount")]
pub enum AvailableCredit {
    Unlimited,
    Limited(Money),
}

impl AvailableCredit {
    /// Whether a candidate amount fits within the remaining headroom.
    pub fn admits(&self, candidate: Money) -> bool {
        match self {
            AvailableCredit::Unlimited => true,
            AvailableCredit::Limited(available) => candidate <= *available,
        }
    }
}

/// Parse a monetary or rate field, defaulting to zero when unparseable.
/// Form input mid-edit ("", "abc") must degrade to 0 rather than poison
/// downstream display figures.
pub fn decimal_or_zero(raw: &str) -> Money {
    Decimal::from_str(raw.trim()).unwrap_or(Decimal::ZERO)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
