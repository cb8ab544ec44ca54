//! Outcomes of store operations that can be turned down
//!
//! A rejected operation is not an error: it leaves the document untouched and
//! reports a message meant for the user.

use serde::Serialize;
use thiserror::Error;

/// Why an operation was turned down
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("Hostel ID not found.")]
    HostelNotFound,

    #[error("Student already joined this hostel.")]
    AlreadyJoined,

    #[error("Owner not found.")]
    OwnerNotFound,

    #[error("Student not found.")]
    StudentNotFound,
}

/// Success flag plus a message on failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(reason: Rejection) -> Self {
        Self {
            success: false,
            message: Some(reason.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<Rejection> for ActionResult {
    fn from(reason: Rejection) -> Self {
        Self::rejected(reason)
    }
}
