//! Profile Use Case
//!
//! Profile lookup for authenticated users and role management for admins.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Profile use case
pub struct ProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Fetch a user's profile
    pub async fn get(&self, user_id: &UserId) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Set a user's role (admin operation)
    pub async fn set_role(&self, user_id: &UserId, role: &str) -> AuthResult<User> {
        let role =
            UserRole::parse(role).ok_or_else(|| AuthError::Validation("invalid role".to_string()))?;

        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        user.set_role(role);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User role updated");
        Ok(user)
    }
}
