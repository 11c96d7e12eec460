//! Password Policy, Hashing and Verification
//!
//! Deterministic password policy with an ordered failure vocabulary, plus
//! Argon2id hashing:
//! - Policy failures report the first violated rule, in a fixed order,
//!   so the HTTP layer can translate each reason to a specific response
//! - Hashes are PHC strings embedding their own salt and cost parameters
//! - Verification never panics: a malformed hash verifies as `false`
//! - Clear-text passwords are zeroized on drop and redacted in Debug

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::random_hex;

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in bytes
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length in bytes
pub const MAX_PASSWORD_LENGTH: usize = 72;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violations, in checking order.
///
/// `validate` reports the first rule violated, checked top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("password must be at least 6 characters long")]
    TooShort,

    /// Password is too long
    #[error("password must be less than 72 characters")]
    TooLong,

    /// No uppercase letter
    #[error("password must contain at least one uppercase letter")]
    MissingUppercase,

    /// No lowercase letter
    #[error("password must contain at least one lowercase letter")]
    MissingLowercase,

    /// No digit
    #[error("password must contain at least one number")]
    MissingDigit,

    /// No punctuation or symbol character
    #[error("password must contain at least one special character")]
    MissingSpecial,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Policy
// ============================================================================

/// Validate a password against the policy.
///
/// Rules, checked in order:
/// 1. at least [`MIN_PASSWORD_LENGTH`] bytes
/// 2. at most [`MAX_PASSWORD_LENGTH`] bytes
/// 3. at least one uppercase letter
/// 4. at least one lowercase letter
/// 5. at least one digit
/// 6. at least one punctuation-or-symbol character
pub fn validate(password: &str) -> Result<(), PasswordPolicyError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooLong);
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for ch in password.chars() {
        if ch.is_uppercase() {
            has_upper = true;
        } else if ch.is_lowercase() {
            has_lower = true;
        } else if ch.is_numeric() {
            has_digit = true;
        } else if is_special(ch) {
            has_special = true;
        }
    }

    if !has_upper {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !has_lower {
        return Err(PasswordPolicyError::MissingLowercase);
    }
    if !has_digit {
        return Err(PasswordPolicyError::MissingDigit);
    }
    if !has_special {
        return Err(PasswordPolicyError::MissingSpecial);
    }

    Ok(())
}

/// Punctuation or symbol. Whitespace and control characters count for
/// no character class.
fn is_special(ch: char) -> bool {
    !ch.is_alphanumeric() && !ch.is_whitespace() && !ch.is_control()
}

/// Generate a secure random token: `2 * n_bytes` lowercase hex characters.
///
/// Panics if the OS RNG fails.
pub fn random_token(n_bytes: usize) -> String {
    random_hex(n_bytes)
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; Debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PlainPassword(String);

impl PlainPassword {
    /// Create a policy-validated clear text password
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        validate(&raw)?;
        Ok(Self(raw))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id
    ///
    /// Returns a PHC-formatted hash string wrapped in [`HashedPassword`].
    /// Default Argon2id parameters (m=19456 KiB, t=2, p=1) keep
    /// verification above the 50 ms floor on commodity hardware.
    pub fn hash(&self) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string embeds the algorithm identifier, version, parameters,
/// salt and hash, so the cost can be raised without schema changes.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from a PHC string, validating the format
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// Create from a stored value without validation
    ///
    /// A malformed stored hash is tolerated here; `verify` returns `false`
    /// for it instead of failing the load.
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    /// Get the PHC string for storage
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// Returns `false` for a wrong password and for a malformed hash.
    /// The digest comparison inside Argon2 is constant-time.
    pub fn verify(&self, password: &str) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
