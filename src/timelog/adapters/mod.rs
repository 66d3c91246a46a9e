//! Adapter implementations for timelog ports.

pub mod memory;
