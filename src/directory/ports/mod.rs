//! Port contracts for directory lookups.
//!
//! Ports define infrastructure-agnostic interfaces used to resolve user and
//! department references at write time.

pub mod lookup;

pub use lookup::{DepartmentDirectory, DirectoryError, DirectoryResult, UserDirectory};
