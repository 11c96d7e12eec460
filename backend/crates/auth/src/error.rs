//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system. HTTP status codes
//! are routed through [`ErrorKind`] by matching on the variant, never by
//! comparing error strings.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordPolicyError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request payload failed validation (username/email shape, role code)
    #[error("{0}")]
    Validation(String),

    /// Password rejected by the policy
    #[error(transparent)]
    PasswordPolicy(#[from] PasswordPolicyError),

    /// Email already registered (pre-check)
    #[error("user with this email already exists")]
    EmailTaken,

    /// User name already registered (pre-check)
    #[error("user with this username already exists")]
    UsernameTaken,

    /// Unique index rejected the insert (registration race)
    #[error("user already exists")]
    UserExists,

    /// User already has a session; caller should replace it
    #[error("session already exists")]
    SessionExists,

    /// Login failure. Deliberately covers both unknown email and wrong
    /// password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Guard rejection. Deliberately covers missing/malformed headers,
    /// expired or forged credentials, and revoked or inactive sessions.
    #[error("authentication required")]
    Unauthorized,

    /// Authenticated but lacks the admin role
    #[error("admin access required")]
    Forbidden,

    /// Refresh credential failed validation or does not match the session
    #[error("invalid refresh token")]
    InvalidRefreshToken,

    /// No session for the refresh credential's user
    #[error("session not found")]
    SessionNotFound,

    /// Session exists but is inactive or past its expiry
    #[error("session is expired or inactive")]
    SessionExpired,

    /// User not found
    #[error("user not found")]
    UserNotFound,

    /// Storage error
    #[error("storage error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Storage call exceeded its deadline
    #[error("storage operation timed out")]
    StoreTimeout,

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::PasswordPolicy(_) => ErrorKind::BadRequest,
            AuthError::EmailTaken
            | AuthError::UsernameTaken
            | AuthError::UserExists
            | AuthError::SessionExists => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::Unauthorized
            | AuthError::InvalidRefreshToken
            | AuthError::SessionNotFound
            | AuthError::SessionExpired => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::StoreTimeout | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth storage error");
            }
            AuthError::StoreTimeout => {
                tracing::error!("Auth storage call timed out");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidRefreshToken => {
                tracing::warn!("Rejected refresh token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
