//! Taskflow: time-aware task management core.
//!
//! This crate provides the core functionality for coordinating task
//! lifecycles with per-user time tracking: a user holds at most one open
//! time entry system-wide, and task status transitions stay consistent with
//! that entry under concurrent requests.
//!
//! # Architecture
//!
//! Taskflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory stores)
//!
//! # Modules
//!
//! - [`directory`]: User and department records and lookup ports
//! - [`task`]: Task records and the lifecycle state machine
//! - [`timelog`]: Time entries and the single-open-entry-per-user tracker

pub mod directory;
pub mod task;
pub mod timelog;
