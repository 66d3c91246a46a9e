//! Task lifecycle management for Taskflow.
//!
//! This module implements task records and the status state machine
//! (`Pending → InProgress → {Paused, Completed}`), coordinated with the
//! per-user timer owned by [`crate::timelog`]. Lifecycle operations keep
//! task status and timer state consistent: a timer failure aborts the whole
//! operation with no persisted task change. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
