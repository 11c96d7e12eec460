//! Token Service
//!
//! Issues and validates the bearer credentials: JWTs signed with
//! HMAC-SHA-256. Access and refresh credentials share one claim layout
//! and key; they differ only in TTL at issue time. The session layer is
//! what distinguishes them (the refresh credential is the one stored on
//! the session).

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::application::config::AuthConfig;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};

/// Claims carried inside access and refresh credentials.
///
/// Integrity-protected but not confidential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user's ID
    pub user_id: String,
    /// Email at issue time
    pub email: String,
    /// Role at issue time
    pub role: UserRole,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    fn new(user_id: &UserId, email: &Email, role: UserRole, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id: user_id.to_string(),
            email: email.as_str().to_string(),
            role,
            iat: now,
            exp: now + ttl.as_secs() as i64,
        }
    }
}

/// Token errors. Validation failures are a single opaque variant so
/// callers cannot surface expiry vs. forgery to clients.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("invalid token")]
    Invalid,
}

/// Issues and validates signed bearer credentials.
///
/// Pure except for the signing key; safe to share behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            config.access_ttl,
            config.refresh_ttl,
        )
    }

    /// Issue an access credential expiring at `now + access_ttl`
    pub fn issue_access(
        &self,
        user_id: &UserId,
        email: &Email,
        role: UserRole,
    ) -> Result<String, TokenError> {
        self.issue(Claims::new(user_id, email, role, self.access_ttl))
    }

    /// Issue a refresh credential expiring at `now + refresh_ttl`
    pub fn issue_refresh(
        &self,
        user_id: &UserId,
        email: &Email,
        role: UserRole,
    ) -> Result<String, TokenError> {
        self.issue(Claims::new(user_id, email, role, self.refresh_ttl))
    }

    fn issue(&self, claims: Claims) -> Result<String, TokenError> {
        // Header::default() pins HS256
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verify signature, algorithm and expiry; return the claims.
    ///
    /// Every failure collapses to [`TokenError::Invalid`].
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Clock skew tolerance is zero: an expired credential is expired.
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| TokenError::Invalid)
    }

    /// Validate a refresh credential and mint a new access credential with
    /// the same identity claims. Does not consult the session store; that
    /// is the caller's responsibility.
    pub fn refresh_access(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.validate(refresh_token)?;
        self.issue(Claims::new(
            &claims.user_id.parse().map_err(|_| TokenError::Invalid)?,
            &Email::from_stored(claims.email),
            claims.role,
            self.access_ttl,
        ))
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}
