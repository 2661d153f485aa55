//! Transient success and error notifications for the user.
//!
//! The core never presents anything itself. Views collect alerts and the
//! rendering code decides how to show them.

use serde::Serialize;

/// A message to show the user once, e.g. as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    /// Something the user asked for worked.
    Success {
        /// The headline.
        message: String,
        /// Extra detail, may be empty.
        details: String,
    },
    /// Something failed and the user may need to act.
    Error {
        /// The headline.
        message: String,
        /// What went wrong and how to fix it, may be empty.
        details: String,
    },
}

impl Alert {
    /// Create a success alert.
    pub fn success(message: &str, details: &str) -> Self {
        Self::Success {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create an error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Whether this alert reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
