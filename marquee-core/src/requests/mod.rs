//! Identity-keyed availability state and the request submission workflow.

pub mod store;
pub mod workflow;

pub use store::{AvailabilityStore, Representation, TransitionEvent};
pub use workflow::{RequestOutcome, RequestWorkflow};
