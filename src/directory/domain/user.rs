//! User record and validated username.

use super::{DepartmentId, DirectoryDomainError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized, non-empty username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyUsername`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(DirectoryDomainError::EmptyUsername);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the username as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user known to the directory.
///
/// Authentication and credentials are handled outside this crate; the
/// lifecycle layer only needs identity and display attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    full_name: String,
    department: Option<DepartmentId>,
}

impl User {
    /// Creates a new user record with a fresh identifier.
    #[must_use]
    pub fn new(username: Username, full_name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username,
            full_name: full_name.into(),
            department: None,
        }
    }

    /// Sets the department the user belongs to.
    #[must_use]
    pub const fn with_department(mut self, department: DepartmentId) -> Self {
        self.department = Some(department);
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the department reference, if any.
    #[must_use]
    pub const fn department(&self) -> Option<DepartmentId> {
        self.department
    }
}
