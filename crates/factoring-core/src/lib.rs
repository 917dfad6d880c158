pub mod error;
pub mod financing;
pub mod repository;
pub mod types;
pub mod validation;

#[cfg(feature = "credit")]
pub mod credit;

#[cfg(feature = "workflow")]
pub mod workflow;

pub use error::FactoringError;
pub use types::*;

/// Standard result type for all factoring-core operations
pub type FactoringResult<T> = Result<T, FactoringError>;
