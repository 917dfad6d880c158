use clap::{Args, ValueEnum};
use serde_json::Value;

use factoring_core::types::DocumentKind;
use factoring_core::validation;

/// Arguments for document validation
#[derive(Args)]
pub struct CheckDocumentArgs {
    /// Document kind
    #[arg(long, value_enum)]
    pub kind: DocKind,

    /// Document number
    #[arg(long)]
    pub number: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DocKind {
    Ruc,
    Dni,
    Ce,
    Passport,
}

impl From<DocKind> for DocumentKind {
    fn from(kind: DocKind) -> Self {
        match kind {
            DocKind::Ruc => DocumentKind::Ruc,
            DocKind::Dni => DocumentKind::Dni,
            DocKind::Ce => DocumentKind::ForeignerCard,
            DocKind::Passport => DocumentKind::Passport,
        }
    }
}

pub fn run_check_document(args: CheckDocumentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let kind = DocumentKind::from(args.kind);
    let value = match validation::validate_document(kind, &args.number) {
        Ok(()) => serde_json::json!({
            "kind": kind,
            "number": args.number,
            "valid": true,
        }),
        Err(e) => serde_json::json!({
            "kind": kind,
            "number": args.number,
            "valid": false,
            "error": e.to_string(),
        }),
    };
    Ok(value)
}
