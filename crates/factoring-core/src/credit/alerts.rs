use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::limits::utilized_credit;
use crate::{types::*, FactoringResult};

const CRITICAL_THRESHOLD: Decimal = dec!(90);
const HIGH_THRESHOLD: Decimal = dec!(80);
const MEDIUM_THRESHOLD: Decimal = dec!(60);

// ---------------------------------------------------------------------------
// Utilization
// ---------------------------------------------------------------------------

/// Utilization of the credit line in percent. Zero when the client has no
/// line set; not capped at 100 when over-utilized.
pub fn utilization_percent(client: &Client, invoices: &[Invoice]) -> Decimal {
    match client.credit_ceiling() {
        None => Decimal::ZERO,
        Some(line) => utilized_credit(client.id, invoices) / line * dec!(100),
    }
}

/// Alert severity derived from utilization. Over-100% utilization lands in
/// Critical like anything at or above 90.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Low,
    Medium,
    High,
    Critical,
}

pub fn alert_level(percent: Decimal) -> AlertLevel {
    if percent >= CRITICAL_THRESHOLD {
        AlertLevel::Critical
    } else if percent >= HIGH_THRESHOLD {
        AlertLevel::High
    } else if percent >= MEDIUM_THRESHOLD {
        AlertLevel::Medium
    } else {
        AlertLevel::Low
    }
}

/// One row of the utilization watch list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientUtilization {
    pub client_id: u64,
    pub name: String,
    pub credit_line: Money,
    pub utilized: Money,
    pub utilization_pct: Decimal,
    pub alert: AlertLevel,
}

/// Clients with a set credit line whose utilization is at or over the
/// threshold, highest utilization first. Recomputed fresh on every call;
/// nothing is cached.
pub fn clients_near_limit(
    clients: &[Client],
    invoices: &[Invoice],
    threshold_pct: Decimal,
) -> Vec<ClientUtilization> {
    let mut watched: Vec<ClientUtilization> = clients
        .iter()
        .filter_map(|c| {
            let line = c.credit_ceiling()?;
            let utilized = utilized_credit(c.id, invoices);
            let pct = utilized / line * dec!(100);
            (pct >= threshold_pct).then(|| ClientUtilization {
                client_id: c.id,
                name: c.name.clone(),
                credit_line: line,
                utilized,
                utilization_pct: pct,
                alert: alert_level(pct),
            })
        })
        .collect();
    watched.sort_by(|a, b| b.utilization_pct.cmp(&a.utilization_pct));
    watched
}

// ---------------------------------------------------------------------------
// Report operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilizationReportInput {
    pub clients: Vec<Client>,
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilizationReportOutput {
    /// Every client with a set credit line, highest utilization first.
    pub clients: Vec<ClientUtilization>,
    pub critical_count: usize,
}

/// Utilization and alert level for every client that carries a credit
/// line, for the dashboard watch list.
pub fn utilization_report(
    input: &UtilizationReportInput,
) -> FactoringResult<ComputationOutput<UtilizationReportOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // Threshold zero keeps every client that has a line at all.
    let rows = clients_near_limit(&input.clients, &input.invoices, Decimal::ZERO);

    for row in &rows {
        if row.utilization_pct > dec!(100) {
            warnings.push(format!(
                "Client '{}' is over its credit line ({}%).",
                row.name, row.utilization_pct
            ));
        }
    }

    let critical_count = rows
        .iter()
        .filter(|r| r.alert == AlertLevel::Critical)
        .count();

    let output = UtilizationReportOutput {
        clients: rows,
        critical_count,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "counted_states": "Pending, Approved",
        "thresholds": { "medium": "60", "high": "80", "critical": "90" },
    });

    Ok(with_metadata(
        "Credit Line Utilization Report",
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
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn client(id: u64, name: &str, credit_line: Option<Decimal>) -> Client {
        Client {
            id,
            name: name.into(),
            document_kind: DocumentKind::Ruc,
            document: "20123456786".into(),
            credit_line,
            invoice_limit: None,
            status: ClientStatus::Active,
            kind: ClientKind::Client,
            email: None,
            phone: None,
        }
    }

    fn invoice(id: u64, client_id: u64, amount: Decimal) -> Invoice {
        Invoice {
            id,
            invoice_number: format!("F001-{id:05}"),
            client_id,
            amount,
            issue_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            due_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            discount_rate: dec!(12),
            status: InvoiceStatus::Pending,
        }
    }

    #[test]
    fn test_alert_thresholds() {
        assert_eq!(alert_level(dec!(59)), AlertLevel::Low);
        assert_eq!(alert_level(dec!(60)), AlertLevel::Medium);
        assert_eq!(alert_level(dec!(80)), AlertLevel::High);
        assert_eq!(alert_level(dec!(90)), AlertLevel::Critical);
        assert_eq!(alert_level(dec!(145)), AlertLevel::Critical);
        assert_eq!(alert_level(Decimal::ZERO), AlertLevel::Low);
    }

    #[test]
    fn test_utilization_percent_unclamped() {
        let c = client(1, "Pesquera Chimbote", Some(dec!(100_000)));
        let invoices = vec![invoice(1, 1, dec!(130_000))];
        assert_eq!(utilization_percent(&c, &invoices), dec!(130));
    }

    #[test]
    fn test_utilization_percent_zero_without_line() {
        let c = client(1, "Pesquera Chimbote", None);
        let invoices = vec![invoice(1, 1, dec!(130_000))];
        assert_eq!(utilization_percent(&c, &invoices), Decimal::ZERO);
    }

    #[test]
    fn test_clients_near_limit_filters_and_sorts() {
        let clients = vec![
            client(1, "Bajo", Some(dec!(100_000))),     // 10%
            client(2, "Critico", Some(dec!(100_000))),  // 95%
            client(3, "Alto", Some(dec!(100_000))),     // 82%
            client(4, "Sin linea", None),               // never watched
        ];
        let invoices = vec![
            invoice(1, 1, dec!(10_000)),
            invoice(2, 2, dec!(95_000)),
            invoice(3, 3, dec!(82_000)),
            invoice(4, 4, dec!(999_999)),
        ];

        let watched = clients_near_limit(&clients, &invoices, dec!(80));
        assert_eq!(watched.len(), 2);
        assert_eq!(watched[0].name, "Critico");
        assert_eq!(watched[0].utilization_pct, dec!(95));
        assert_eq!(watched[0].alert, AlertLevel::Critical);
        assert_eq!(watched[1].name, "Alto");
        assert_eq!(watched[1].alert, AlertLevel::High);
    }

    #[test]
    fn test_clients_near_limit_is_idempotent() {
        let clients = vec![client(1, "Repetible", Some(dec!(50_000)))];
        let invoices = vec![invoice(1, 1, dec!(45_000))];
        let first = clients_near_limit(&clients, &invoices, dec!(80));
        let second = clients_near_limit(&clients, &invoices, dec!(80));
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].utilization_pct, second[0].utilization_pct);
    }

    #[test]
    fn test_utilization_report_counts_critical_and_warns_over_line() {
        let input = UtilizationReportInput {
            clients: vec![
                client(1, "Holgado", Some(dec!(100_000))),
                client(2, "Excedido", Some(dec!(100_000))),
            ],
            invoices: vec![invoice(1, 1, dec!(20_000)), invoice(2, 2, dec!(110_000))],
        };
        let result = utilization_report(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.clients.len(), 2);
        assert_eq!(out.clients[0].name, "Excedido");
        assert_eq!(out.critical_count, 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Excedido"));
    }
}
