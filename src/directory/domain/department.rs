//! Department record and validated department name.

use super::{DepartmentId, DirectoryDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized, non-empty department name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentName(String);

impl DepartmentName {
    /// Creates a validated department name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyDepartmentName`] when the value
    /// is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(DirectoryDomainError::EmptyDepartmentName);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the department name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DepartmentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DepartmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A department known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    id: DepartmentId,
    name: DepartmentName,
}

impl Department {
    /// Creates a new department record with a fresh identifier.
    #[must_use]
    pub fn new(name: DepartmentName) -> Self {
        Self {
            id: DepartmentId::new(),
            name,
        }
    }

    /// Returns the department identifier.
    #[must_use]
    pub const fn id(&self) -> DepartmentId {
        self.id
    }

    /// Returns the department name.
    #[must_use]
    pub const fn name(&self) -> &DepartmentName {
        &self.name
    }
}
