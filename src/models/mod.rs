pub mod environment;
pub mod status;

pub use environment::{Environment, RunConfig};
pub use status::{Phase, PhaseOutcome, RunSummary, ServiceEndpoint, StatusSnapshot};
