//! Domain model for time tracking.
//!
//! A time entry records one block of work by one user on one task. Entries
//! open with a start time only and close exactly once, recording their
//! duration in whole minutes.

mod entry;
mod error;
mod ids;

pub use entry::TimeEntry;
pub use error::TimeLogDomainError;
pub use ids::TimeEntryId;
