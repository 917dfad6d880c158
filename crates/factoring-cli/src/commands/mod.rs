pub mod credit;
pub mod documents;
pub mod financing;
pub mod workflow;
