//! Adapter implementations for directory lookup ports.

pub mod memory;

pub use memory::{InMemoryDepartmentDirectory, InMemoryUserDirectory};
