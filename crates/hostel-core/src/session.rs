//! Login sessions
//!
//! The current session is a single `{role, username}` record kept under its
//! own storage key. Operations that need an authorized actor take the
//! session as an argument and check it with [`ensure_role`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key holding the current session
pub const SESSION_KEY: &str = "hostel_session";

/// Kind of account a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a role name
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown role '{0}'. Use 'owner' or 'student'.")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "student" => Ok(Role::Student),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

/// The logged-in actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSession {
    pub role: Role,
    /// Owner contact or student phone
    pub username: String,
}

impl CurrentSession {
    pub fn new(role: Role, username: impl Into<String>) -> Self {
        Self {
            role,
            username: username.into(),
        }
    }
}

/// Authorization failures
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please login as {0}")]
    NotLoggedIn(Role),

    #[error("Please login as {expected} (logged in as {actual})")]
    WrongRole { expected: Role, actual: Role },
}

/// Check that a session exists and has the given role
pub fn ensure_role(session: Option<&CurrentSession>, role: Role) -> Result<&CurrentSession, AuthError> {
    match session {
        None => Err(AuthError::NotLoggedIn(role)),
        Some(s) if s.role != role => Err(AuthError::WrongRole {
            expected: role,
            actual: s.role,
        }),
        Some(s) => Ok(s),
    }
}
