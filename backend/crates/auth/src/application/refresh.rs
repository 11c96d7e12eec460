//! Refresh Use Case
//!
//! Exchanges a refresh credential for a new access credential while the
//! server-side session remains live. The refresh credential itself is
//! returned unchanged (no rotation).

use std::sync::Arc;

use platform::crypto::constant_time_eq;

use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};
use crate::token::TokenService;

/// Refresh output: the user, a fresh access credential, and the same
/// refresh credential that was submitted.
#[derive(Debug)]
pub struct RefreshOutput {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh use case
pub struct RefreshUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> RefreshUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub async fn execute(&self, refresh_token: String) -> AuthResult<RefreshOutput> {
        let claims = self
            .tokens
            .validate(&refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user_id: UserId = claims
            .user_id
            .parse()
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let session = self
            .repo
            .find_by_user_id(&user_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if !session.is_usable() {
            return Err(AuthError::SessionExpired);
        }

        // The credential must be the one bound to the session; a replaced
        // session kills the previous refresh credential immediately.
        if !constant_time_eq(
            session.refresh_token.as_bytes(),
            refresh_token.as_bytes(),
        ) {
            return Err(AuthError::InvalidRefreshToken);
        }

        let user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let access_token = self
            .tokens
            .issue_access(&user.id, &user.email, user.role)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        self.repo.touch(&session.id).await?;

        tracing::debug!(user_id = %user.id, "Access credential refreshed");

        Ok(RefreshOutput {
            user,
            access_token,
            refresh_token,
        })
    }
}
