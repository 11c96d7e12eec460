//! Register Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use platform::password::PlainPassword;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Create the user; returns it with the server-generated id.
    ///
    /// The email/username pre-checks are an optimisation for friendly
    /// errors; the store's unique indexes are the source of truth, and a
    /// losing race surfaces as [`AuthError::UserExists`] from `create`.
    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        let username = UserName::new(input.username)?;
        let email = Email::new(input.email)?;

        // Policy errors surface verbatim (ordered first-failing reason)
        let password = PlainPassword::new(input.password)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = password
            .hash()
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User::new(username, email, password_hash);
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User registered"
        );

        Ok(user)
    }
}
