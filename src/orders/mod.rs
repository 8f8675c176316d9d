//! Order pipeline: validation against live catalog data, deadline-bounded commit,
//! and sales reporting.

pub mod error;
pub mod orchestrator;

pub use error::OrderError;
pub use orchestrator::OrderOrchestrator;
