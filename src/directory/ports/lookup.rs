//! Lookup ports for user and department records.

use crate::directory::domain::{Department, DepartmentId, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory lookup operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// User lookup contract.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user by identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<User>>;
}

/// Department lookup contract.
#[async_trait]
pub trait DepartmentDirectory: Send + Sync {
    /// Finds a department by identifier.
    ///
    /// Returns `None` when the department does not exist.
    async fn find_by_id(&self, id: DepartmentId) -> DirectoryResult<Option<Department>>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
