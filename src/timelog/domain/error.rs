//! Error types for timelog domain validation.

use super::TimeEntryId;
use thiserror::Error;

/// Errors returned while mutating domain time entry values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeLogDomainError {
    /// The entry already has an end time and cannot change again.
    #[error("time entry {0} is already closed")]
    AlreadyClosed(TimeEntryId),
}
