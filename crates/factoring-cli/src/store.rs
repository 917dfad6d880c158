use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use factoring_core::repository::FactoringStore;
use factoring_core::types::{Client, Invoice};
use factoring_core::{FactoringError, FactoringResult};

/// On-disk analogue of the original front end's browser storage: a single
/// JSON document holding both entity collections.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    clients: Vec<Client>,
    #[serde(default)]
    invoices: Vec<Invoice>,
}

pub struct JsonStore {
    path: PathBuf,
    document: StoreDocument,
}

impl JsonStore {
    pub fn open(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;
        let document: StoreDocument = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", path, e))?;
        Ok(Self {
            path: PathBuf::from(path),
            document,
        })
    }
}

impl FactoringStore for JsonStore {
    fn load_clients(&self) -> FactoringResult<Vec<Client>> {
        Ok(self.document.clients.clone())
    }

    fn load_invoices(&self) -> FactoringResult<Vec<Invoice>> {
        Ok(self.document.invoices.clone())
    }

    fn save_invoices(&mut self, invoices: &[Invoice]) -> FactoringResult<()> {
        self.document.invoices = invoices.to_vec();
        let serialized = serde_json::to_string_pretty(&self.document)?;
        fs::write(&self.path, serialized).map_err(|e| {
            FactoringError::Storage(format!("failed to write '{}': {}", self.path.display(), e))
        })?;
        Ok(())
    }
}
