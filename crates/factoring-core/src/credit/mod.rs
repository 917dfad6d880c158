pub mod alerts;
pub mod limits;
