//! Orchestration services for time tracking.

pub mod tracker;

pub use tracker::{StopOutcome, TimeTrackingError, TimeTrackingResult, TimeTrackingService};
