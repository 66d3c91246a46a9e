//! Time tracking for Taskflow.
//!
//! This module owns the single-open-entry invariant: for any user, at most
//! one time entry without an end time exists at any instant. The tracker
//! serializes check-then-act sequences per user and the in-memory store
//! backs it up with a uniqueness constraint on the open slot. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
