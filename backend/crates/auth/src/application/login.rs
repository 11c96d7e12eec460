//! Login Use Case
//!
//! Authenticates a user, issues the credential pair, and creates (or
//! replaces) the server-side session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};
use crate::token::TokenService;

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output: the user plus the credential pair
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // A malformed email cannot belong to a user; same opaque failure
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = UserRepository::find_by_email(self.repo.as_ref(), &email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.password_hash.verify(&input.password) {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self
            .tokens
            .issue_access(&user.id, &user.email, user.role)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let refresh_token = self
            .tokens
            .issue_refresh(&user.id, &user.email, user.role)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let session = Session::new(
            user.id,
            user.username.clone(),
            refresh_token.clone(),
            self.config.session_ttl_chrono(),
        );

        // Latest login wins: the unique user_id index linearizes
        // concurrent logins, and the loser replaces the stored session.
        match SessionRepository::create(self.repo.as_ref(), &session).await {
            Err(AuthError::SessionExists) => {
                SessionRepository::update(self.repo.as_ref(), &session).await?;
            }
            other => other?,
        }

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User logged in"
        );

        Ok(LoginOutput {
            user,
            access_token,
            refresh_token,
        })
    }
}
