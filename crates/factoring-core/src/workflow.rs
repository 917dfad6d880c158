//! Invoice-booking workflow: the business steps behind the multi-step
//! invoice form. Eligibility and field problems are errors; a credit
//! rejection is a normal outcome the caller shows to the user.

use serde::{Deserialize, Serialize};

use crate::credit::limits::{validate, CreditDecision, RejectionReason};
use crate::financing::{discount_amount, financing_days, net_payout, parse_date};
use crate::repository::FactoringStore;
use crate::validation::validate_invoice_draft;
use crate::{types::*, FactoringError, FactoringResult};

/// A persisted invoice together with the derived financing figures the
/// front end displays after booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedInvoice {
    pub invoice: Invoice,
    pub financing_days: i64,
    pub discount: Money,
    pub net_payout: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail")]
pub enum BookingOutcome {
    Booked(BookedInvoice),
    Declined(RejectionReason),
}

/// Book a candidate invoice: eligibility, field validation, credit check,
/// then persistence with status Pending. State transitions after booking
/// (Approved, Rejected, Paid) are set externally.
pub fn book_invoice(
    store: &mut dyn FactoringStore,
    draft: &InvoiceDraft,
) -> FactoringResult<BookingOutcome> {
    let clients = store.load_clients()?;
    let client = clients
        .iter()
        .find(|c| c.id == draft.client_id)
        .ok_or(FactoringError::UnknownClient(draft.client_id))?;

    if client.status == ClientStatus::Inactive {
        return Err(FactoringError::ClientNotEligible {
            id: client.id,
            reason: "client is inactive".into(),
        });
    }
    if client.kind != ClientKind::Client {
        return Err(FactoringError::ClientNotEligible {
            id: client.id,
            reason: "debtors cannot originate financing".into(),
        });
    }

    let invoices = store.load_invoices()?;
    validate_invoice_draft(draft, &invoices)?;

    let issue = parse_date(&draft.issue_date)?;
    let due = parse_date(&draft.due_date)?;
    let days = financing_days(issue, due);

    match validate(client, draft.amount, &invoices) {
        CreditDecision::Rejected(reason) => Ok(BookingOutcome::Declined(reason)),
        CreditDecision::Approved => {
            let next_id = invoices.iter().map(|inv| inv.id).max().unwrap_or(0) + 1;
            let invoice = Invoice {
                id: next_id,
                invoice_number: draft.invoice_number.clone(),
                client_id: client.id,
                amount: draft.amount,
                issue_date: issue,
                due_date: due,
                discount_rate: draft.discount_rate,
                status: InvoiceStatus::Pending,
            };

            let mut all = invoices;
            all.push(invoice.clone());
            store.save_invoices(&all)?;

            Ok(BookingOutcome::Booked(BookedInvoice {
                invoice,
                financing_days: days,
                discount: discount_amount(draft.amount, draft.discount_rate, days),
                net_payout: net_payout(draft.amount, draft.discount_rate, days),
            }))
        }
    }
}
