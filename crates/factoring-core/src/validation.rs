//! Field-level validation for client and invoice data: Peruvian identity
//! documents, contact fields, duplicate detection, and invoice drafts.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::financing::parse_date;
use crate::{types::*, FactoringError, FactoringResult};

/// SUNAT check-digit weights for the first ten RUC digits.
const RUC_FACTORS: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

// ---------------------------------------------------------------------------
// Identity documents
// ---------------------------------------------------------------------------

/// Peruvian RUC: 11 digits, a recognised prefix, and a valid check digit.
pub fn validate_ruc(ruc: &str) -> bool {
    if ruc.len() != 11 || !ruc.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if !matches!(&ruc[..2], "10" | "15" | "16" | "17" | "20") {
        return false;
    }

    let digits: Vec<u32> = ruc.bytes().map(|b| u32::from(b - b'0')).collect();
    let sum: u32 = digits[..10]
        .iter()
        .zip(RUC_FACTORS)
        .map(|(d, f)| d * f)
        .sum();
    let check = match sum % 11 {
        0 => 0,
        1 => 1,
        r => 11 - r,
    };
    digits[10] == check
}

/// Peruvian DNI: exactly 8 digits.
pub fn validate_dni(dni: &str) -> bool {
    dni.len() == 8 && dni.bytes().all(|b| b.is_ascii_digit())
}

/// Carnet de extranjeria: 9-12 alphanumeric characters.
pub fn validate_foreigner_card(ce: &str) -> bool {
    (9..=12).contains(&ce.len()) && ce.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Passport: 6-12 alphanumeric characters.
pub fn validate_passport(passport: &str) -> bool {
    (6..=12).contains(&passport.len()) && passport.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Dispatch on the document kind, reporting a field-specific reason.
pub fn validate_document(kind: DocumentKind, number: &str) -> FactoringResult<()> {
    let reason = match kind {
        _ if number.is_empty() => Some("Document number is required.".to_string()),
        DocumentKind::Ruc if number.len() != 11 => Some("RUC must have 11 digits.".into()),
        DocumentKind::Ruc if !number.bytes().all(|b| b.is_ascii_digit()) => {
            Some("RUC must contain digits only.".into())
        }
        DocumentKind::Ruc if !validate_ruc(number) => {
            Some("RUC check digit is incorrect.".into())
        }
        DocumentKind::Dni if !validate_dni(number) => {
            Some("DNI must have exactly 8 digits.".into())
        }
        DocumentKind::ForeignerCard if !validate_foreigner_card(number) => {
            Some("CE must have 9 to 12 alphanumeric characters.".into())
        }
        DocumentKind::Passport if !validate_passport(number) => {
            Some("Passport must have 6 to 12 alphanumeric characters.".into())
        }
        _ => None,
    };

    match reason {
        Some(reason) => Err(FactoringError::InvalidInput {
            field: "document".into(),
            reason,
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Contact fields (optional: empty input is accepted)
// ---------------------------------------------------------------------------

pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() {
        return true;
    }
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Peruvian mobile number: 9 digits, optionally prefixed with +51.
pub fn is_valid_phone(phone: &str) -> bool {
    if phone.is_empty() {
        return true;
    }
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact.strip_prefix("+51").unwrap_or(&compact);
    digits.len() == 9 && digits.bytes().all(|b| b.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Duplicate detection
// ---------------------------------------------------------------------------

/// Whether another client already carries this document number.
/// `current_id` excludes the record being edited.
pub fn document_exists(document: &str, clients: &[Client], current_id: Option<u64>) -> bool {
    clients
        .iter()
        .any(|c| c.document == document && Some(c.id) != current_id)
}

/// Whether another invoice already carries this number. Invoice numbers
/// are unique across the whole collection.
pub fn invoice_number_exists(number: &str, invoices: &[Invoice], current_id: Option<u64>) -> bool {
    invoices
        .iter()
        .any(|inv| inv.invoice_number == number && Some(inv.id) != current_id)
}

// ---------------------------------------------------------------------------
// Invoice drafts
// ---------------------------------------------------------------------------

/// Check every field of a candidate invoice before the credit decision:
/// number present and unique, positive amount, rate within 0-100, and due
/// date strictly after the issue date.
pub fn validate_invoice_draft(draft: &InvoiceDraft, invoices: &[Invoice]) -> FactoringResult<()> {
    if draft.invoice_number.trim().is_empty() {
        return Err(FactoringError::InvalidInput {
            field: "invoice_number".into(),
            reason: "Invoice number is required.".into(),
        });
    }
    if invoice_number_exists(&draft.invoice_number, invoices, None) {
        return Err(FactoringError::DuplicateInvoiceNumber(
            draft.invoice_number.clone(),
        ));
    }
    if draft.amount <= Decimal::ZERO {
        return Err(FactoringError::InvalidInput {
            field: "amount".into(),
            reason: "Amount must be positive.".into(),
        });
    }
    if draft.discount_rate < Decimal::ZERO || draft.discount_rate > dec!(100) {
        return Err(FactoringError::InvalidInput {
            field: "discount_rate".into(),
            reason: "Annual discount rate must be between 0 and 100 percent.".into(),
        });
    }

    let issue = parse_date(&draft.issue_date)?;
    let due = parse_date(&draft.due_date)?;
    if due <= issue {
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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ruc_accepts_valid_numbers() {
        // Check digits computed with the SUNAT weights 5,4,3,2,7,6,5,4,3,2
        assert!(validate_ruc("20123456786"));
        assert!(validate_ruc("20601234565"));
    }

    #[test]
    fn test_ruc_rejects_bad_check_digit() {
        assert!(!validate_ruc("20123456780"));
        assert!(!validate_ruc("20123456789"));
    }

    #[test]
    fn test_ruc_rejects_shape_errors() {
        assert!(!validate_ruc(""));
        assert!(!validate_ruc("2012345678"));      // 10 digits
        assert!(!validate_ruc("201234567861"));    // 12 digits
        assert!(!validate_ruc("2012345678X"));     // non-digit
        assert!(!validate_ruc("30123456786"));     // unknown prefix
    }

    #[test]
    fn test_dni() {
        assert!(validate_dni("12345678"));
        assert!(!validate_dni("1234567"));
        assert!(!validate_dni("123456789"));
        assert!(!validate_dni("1234567a"));
    }

    #[test]
    fn test_foreigner_card_and_passport() {
        assert!(validate_foreigner_card("CE1234567"));
        assert!(!validate_foreigner_card("CE123"));
        assert!(!validate_foreigner_card("CE-1234567"));
        assert!(validate_passport("AB1234"));
        assert!(!validate_passport("AB1"));
        assert!(!validate_passport("ABCDEFGHIJKLM"));
    }

    #[test]
    fn test_validate_document_reports_field_reasons() {
        assert!(validate_document(DocumentKind::Ruc, "20123456786").is_ok());

        let err = validate_document(DocumentKind::Ruc, "20123456780").unwrap_err();
        match err {
            FactoringError::InvalidInput { field, reason } => {
                assert_eq!(field, "document");
                assert!(reason.contains("check digit"));
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        assert!(validate_document(DocumentKind::Dni, "").is_err());
        assert!(validate_document(DocumentKind::Passport, "AB1234").is_ok());
    }

    #[test]
    fn test_email_optional_but_well_formed() {
        assert!(is_valid_email(""));
        assert!(is_valid_email("tesoreria@andina.pe"));
        assert!(!is_valid_email("sin-arroba.pe"));
        assert!(!is_valid_email("dos@@arrobas.pe"));
        assert!(!is_valid_email("con espacios@dominio.pe"));
        assert!(!is_valid_email("usuario@sindominio"));
    }

    #[test]
    fn test_phone_optional_with_country_code() {
        assert!(is_valid_phone(""));
        assert!(is_valid_phone("987654321"));
        assert!(is_valid_phone("+51987654321"));
        assert!(is_valid_phone("+51 987 654 321"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("98765432a"));
    }

    fn sample_invoices() -> Vec<Invoice> {
        vec![Invoice {
            id: 1,
            invoice_number: "F001-00001".into(),
            client_id: 3,
            amount: dec!(10_000),
            issue_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            due_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            discount_rate: dec!(10),
            status: InvoiceStatus::Pending,
        }]
    }

    fn draft() -> InvoiceDraft {
        InvoiceDraft {
            invoice_number: "F001-00002".into(),
            client_id: 3,
            amount: dec!(5_000),
            issue_date: "2025-02-01".into(),
            due_date: "2025-05-01".into(),
            discount_rate: dec!(14),
        }
    }

    #[test]
    fn test_invoice_number_exists_honours_current_id() {
        let invoices = sample_invoices();
        assert!(invoice_number_exists("F001-00001", &invoices, None));
        assert!(!invoice_number_exists("F001-00001", &invoices, Some(1)));
        assert!(!invoice_number_exists("F001-00099", &invoices, None));
    }

    #[test]
    fn test_draft_happy_path() {
        assert!(validate_invoice_draft(&draft(), &sample_invoices()).is_ok());
    }

    #[test]
    fn test_draft_duplicate_number() {
        let mut d = draft();
        d.invoice_number = "F001-00001".into();
        let err = validate_invoice_draft(&d, &sample_invoices()).unwrap_err();
        match err {
            FactoringError::DuplicateInvoiceNumber(n) => assert_eq!(n, "F001-00001"),
            other => panic!("Expected DuplicateInvoiceNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_draft_rejects_bad_fields() {
        let invoices = sample_invoices();

        let mut d = draft();
        d.amount = Decimal::ZERO;
        assert!(validate_invoice_draft(&d, &invoices).is_err());

        let mut d = draft();
        d.discount_rate = dec!(100.5);
        assert!(validate_invoice_draft(&d, &invoices).is_err());

        let mut d = draft();
        d.due_date = d.issue_date.clone();
        assert!(validate_invoice_draft(&d, &invoices).is_err());

        let mut d = draft();
        d.issue_date = "02/01/2025".into();
        match validate_invoice_draft(&d, &invoices).unwrap_err() {
            FactoringError::InvalidDate(_) => {}
            other => panic!("Expected InvalidDate, got {other:?}"),
        }
    }
}
