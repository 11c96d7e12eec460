//! Logout Use Case
//!
//! Deletes the user's server-side session, revoking the refresh
//! credential and every guarded use of still-unexpired access
//! credentials.

use std::sync::Arc;

use crate::domain::repository::SessionRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    /// Idempotent: logging out without a session is a success.
    pub async fn execute(&self, user_id: &UserId) -> AuthResult<()> {
        self.session_repo.delete_by_user_id(user_id).await?;

        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::session::Session;
    use crate::domain::value_object::user_name::UserName;
    use crate::infra::memory::MemoryAuthRepository;

    #[tokio::test]
    async fn test_logout_deletes_session() {
        let repo = Arc::new(MemoryAuthRepository::new());
        let user_id = UserId::new();
        let session = Session::new(
            user_id,
            UserName::new("alice").unwrap(),
            "refresh".to_string(),
            chrono::Duration::days(7),
        );
        SessionRepository::create(repo.as_ref(), &session)
            .await
            .unwrap();

        LogoutUseCase::new(repo.clone())
            .execute(&user_id)
            .await
            .unwrap();

        assert!(
            SessionRepository::find_by_user_id(repo.as_ref(), &user_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let repo = Arc::new(MemoryAuthRepository::new());
        let uc = LogoutUseCase::new(repo);
        let user_id = UserId::new();

        // No session exists; both calls succeed
        uc.execute(&user_id).await.unwrap();
        uc.execute(&user_id).await.unwrap();
    }
}
