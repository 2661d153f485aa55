//! The identity of the signed in user.
//!
//! Authentication happens elsewhere. The core only receives the resulting user
//! ID as an explicit value, never from ambient global state.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Get the user ID of the signed in user.
///
/// # Errors
/// Returns [Error::NotAuthenticated] if nobody is signed in.
pub fn require_identity(identity: Option<UserId>) -> Result<UserId, Error> {
    identity.ok_or(Error::NotAuthenticated)
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        user::{UserId, require_identity},
    };

    #[test]
    fn missing_identity_is_not_authenticated() {
        assert_eq!(require_identity(None), Err(Error::NotAuthenticated));
    }

    #[test]
    fn present_identity_is_returned() {
        assert_eq!(require_identity(Some(UserId::new(7))), Ok(UserId::new(7)));
    }
}
