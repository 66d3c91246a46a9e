//! In-memory directories for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{Department, DepartmentId, User, UserId},
    ports::{DepartmentDirectory, DirectoryError, DirectoryResult, UserDirectory},
};

/// Thread-safe in-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    state: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty in-memory user directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user record, replacing any record with the same identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the directory lock is
    /// poisoned.
    pub fn insert(&self, user: User) -> DirectoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| DirectoryError::persistence(std::io::Error::other(err.to_string())))?;
        state.insert(user.id(), user);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<User>> {
        let state = self
            .state
            .read()
            .map_err(|err| DirectoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.get(&id).cloned())
    }
}

/// Thread-safe in-memory department directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDepartmentDirectory {
    state: Arc<RwLock<HashMap<DepartmentId, Department>>>,
}

impl InMemoryDepartmentDirectory {
    /// Creates an empty in-memory department directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a department record, replacing any record with the same
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the directory lock is
    /// poisoned.
    pub fn insert(&self, department: Department) -> DirectoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| DirectoryError::persistence(std::io::Error::other(err.to_string())))?;
        state.insert(department.id(), department);
        Ok(())
    }
}

#[async_trait]
impl DepartmentDirectory for InMemoryDepartmentDirectory {
    async fn find_by_id(&self, id: DepartmentId) -> DirectoryResult<Option<Department>> {
        let state = self
            .state
            .read()
            .map_err(|err| DirectoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.get(&id).cloned())
    }
}
