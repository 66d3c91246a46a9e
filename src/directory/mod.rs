//! User and department directory for Taskflow.
//!
//! The directory is a read-mostly collaborator: the task lifecycle resolves
//! department and assignee references against it at write time, and tests
//! seed it directly. Full account management (registration, authentication,
//! passwords) lives outside this crate. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
