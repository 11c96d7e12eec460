//! User Name Value Object
//!
//! Public handle used for display and audit. Stored and matched verbatim
//! (case-sensitive); uniqueness is enforced by the persistence index.
//!
//! ## Invariants
//! - Length: 3-50 characters
//! - No leading/trailing whitespace, no control characters

use crate::error::{AuthError, AuthResult};
use std::fmt;
use std::str::FromStr;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 50;

/// User name value object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    /// Create a new user name with validation
    pub fn new(name: impl Into<String>) -> AuthResult<Self> {
        let name = name.into();

        let char_count = name.chars().count();
        if char_count < USER_NAME_MIN_LENGTH {
            return Err(AuthError::Validation(format!(
                "username must be at least {} characters",
                USER_NAME_MIN_LENGTH
            )));
        }
        if char_count > USER_NAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "username must be at most {} characters",
                USER_NAME_MAX_LENGTH
            )));
        }

        if name.trim() != name {
            return Err(AuthError::Validation(
                "username cannot start or end with whitespace".to_string(),
            ));
        }

        if name.chars().any(|c| c.is_control()) {
            return Err(AuthError::Validation(
                "username contains invalid control characters".to_string(),
            ));
        }

        Ok(Self(name))
    }

    /// Create from a stored value (assumed already validated)
    pub fn from_stored(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the user name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to string for storage
    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for UserName {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        UserName::new(s)
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
