//! Port contracts for time entry persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the time
//! tracker.

pub mod repository;

pub use repository::{TimeEntryRepository, TimeEntryRepositoryError, TimeEntryRepositoryResult};
