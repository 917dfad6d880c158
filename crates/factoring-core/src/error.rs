use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactoringError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid date: '{0}' is not a YYYY-MM-DD calendar date")]
    InvalidDate(String),

    #[error("Unknown client: {0}")]
    UnknownClient(u64),

    #[error("Client {id} is not eligible for financing: {reason}")]
    ClientNotEligible { id: u64, reason: String },

    #[error("Invoice number already exists: {0}")]
    DuplicateInvoiceNumber(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FactoringError {
    fn from(e: serde_json::Error) -> Self {
        FactoringError::SerializationError(e.to_string())
    }
}
