//! Storage seam. The core never touches persistent storage itself; entity
//! collections are loaded and saved through this trait, and every
//! computation sees only the snapshot it was handed.

use crate::types::{Client, Invoice};
use crate::FactoringResult;

pub trait FactoringStore {
    fn load_clients(&self) -> FactoringResult<Vec<Client>>;
    fn load_invoices(&self) -> FactoringResult<Vec<Invoice>>;
    fn save_invoices(&mut self, invoices: &[Invoice]) -> FactoringResult<()>;
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub clients: Vec<Client>,
    pub invoices: Vec<Invoice>,
}

impl MemoryStore {
    pub fn new(clients: Vec<Client>, invoices: Vec<Invoice>) -> Self {
        Self { clients, invoices }
    }
}

impl FactoringStore for MemoryStore {
    fn load_clients(&self) -> FactoringResult<Vec<Client>> {
        Ok(self.clients.clone())
    }

    fn load_invoices(&self) -> FactoringResult<Vec<Invoice>> {
        Ok(self.invoices.clone())
    }

    fn save_invoices(&mut self, invoices: &[Invoice]) -> FactoringResult<()> {
        self.invoices = invoices.to_vec();
        Ok(())
    }
}
