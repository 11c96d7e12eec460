//! In-Memory Repository Implementation
//!
//! Enforces the same uniqueness rules as the MongoDB store (users.email,
//! users.username, sessions.user_id). Backs the repository-dependent
//! tests and local development without a database.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, user_id::SessionId, user_id::UserId, user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Inner {
    /// Keyed by user id
    users: RwLock<HashMap<Uuid, User>>,
    /// Keyed by owning user id (at most one session per user)
    sessions: RwLock<HashMap<Uuid, Session>>,
}

/// In-memory auth repository
#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    inner: Arc<Inner>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for MemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.inner.users.write().await;

        let duplicate = users
            .values()
            .any(|u| u.email == user.email || u.username == user.username);
        if duplicate || users.contains_key(user.id.as_uuid()) {
            return Err(AuthError::UserExists);
        }

        users.insert(*user.id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let users = self.inner.users.read().await;
        Ok(users.get(user_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let users = self.inner.users.read().await;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>> {
        let users = self.inner.users.read().await;
        Ok(users.values().find(|u| &u.username == username).cloned())
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.inner.users.write().await;

        let entry = users
            .get_mut(user.id.as_uuid())
            .ok_or(AuthError::UserNotFound)?;
        *entry = User {
            updated_at: Utc::now(),
            ..user.clone()
        };
        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for MemoryAuthRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        let mut sessions = self.inner.sessions.write().await;

        if sessions.contains_key(session.user_id.as_uuid()) {
            return Err(AuthError::SessionExists);
        }

        sessions.insert(*session.user_id.as_uuid(), session.clone());
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Session>> {
        let sessions = self.inner.sessions.read().await;
        Ok(sessions.get(user_id.as_uuid()).cloned())
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Session>> {
        let sessions = self.inner.sessions.read().await;
        Ok(sessions.values().find(|s| &s.username == username).cloned())
    }

    async fn update(&self, session: &Session) -> AuthResult<()> {
        let mut sessions = self.inner.sessions.write().await;

        let entry = sessions
            .get_mut(session.user_id.as_uuid())
            .ok_or(AuthError::SessionNotFound)?;
        // The stored id is kept; everything else is replaced
        *entry = Session {
            id: entry.id,
            last_activity: Utc::now(),
            ..session.clone()
        };
        Ok(())
    }

    async fn touch(&self, session_id: &SessionId) -> AuthResult<()> {
        let mut sessions = self.inner.sessions.write().await;

        let session = sessions
            .values_mut()
            .find(|s| &s.id == session_id)
            .ok_or(AuthError::SessionNotFound)?;
        session.touch();
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: &UserId) -> AuthResult<()> {
        let mut sessions = self.inner.sessions.write().await;
        sessions.remove(user_id.as_uuid());
        Ok(())
    }

    async fn delete_expired(&self) -> AuthResult<u64> {
        let mut sessions = self.inner.sessions.write().await;

        let before = sessions.len();
        let now = Utc::now();
        sessions.retain(|_, s| s.expires_at >= now);
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_role::UserRole;
    use platform::password::PlainPassword;

    fn user(username: &str, email: &str) -> User {
        let hash = PlainPassword::new("Abcdef1!".to_string())
            .unwrap()
            .hash()
            .unwrap();
        User::new(
            UserName::new(username).unwrap(),
            Email::new(email).unwrap(),
            hash,
        )
    }

    fn session(user_id: UserId, refresh: &str) -> Session {
        Session::new(
            user_id,
            UserName::new("alice").unwrap(),
            refresh.to_string(),
            chrono::Duration::days(7),
        )
    }

    #[tokio::test]
    async fn test_user_unique_email_and_username() {
        let repo = MemoryAuthRepository::new();
        UserRepository::create(&repo, &user("alice", "a@x.io"))
            .await
            .unwrap();

        let same_email = UserRepository::create(&repo, &user("bob", "a@x.io")).await;
        assert!(matches!(same_email, Err(AuthError::UserExists)));

        let same_name = UserRepository::create(&repo, &user("alice", "b@x.io")).await;
        assert!(matches!(same_name, Err(AuthError::UserExists)));
    }

    #[tokio::test]
    async fn test_user_lookup_is_case_sensitive() {
        let repo = MemoryAuthRepository::new();
        UserRepository::create(&repo, &user("Alice", "Alice@x.io"))
            .await
            .unwrap();

        let miss = UserRepository::find_by_email(&repo, &Email::new("alice@x.io").unwrap())
            .await
            .unwrap();
        assert!(miss.is_none());

        let hit = UserRepository::find_by_email(&repo, &Email::new("Alice@x.io").unwrap())
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn test_user_update_bumps_updated_at() {
        let repo = MemoryAuthRepository::new();
        let mut u = user("alice", "a@x.io");
        UserRepository::create(&repo, &u).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        u.role = UserRole::Admin;
        UserRepository::update(&repo, &u).await.unwrap();

        let stored = UserRepository::find_by_id(&repo, &u.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.role, UserRole::Admin);
        assert!(stored.updated_at > u.created_at);
    }

    #[tokio::test]
    async fn test_at_most_one_session_per_user() {
        let repo = MemoryAuthRepository::new();
        let user_id = UserId::new();

        SessionRepository::create(&repo, &session(user_id, "first"))
            .await
            .unwrap();
        let dup = SessionRepository::create(&repo, &session(user_id, "second")).await;
        assert!(matches!(dup, Err(AuthError::SessionExists)));
    }

    #[tokio::test]
    async fn test_session_update_keeps_stored_id() {
        let repo = MemoryAuthRepository::new();
        let user_id = UserId::new();

        let first = session(user_id, "first");
        SessionRepository::create(&repo, &first).await.unwrap();

        let replacement = session(user_id, "second");
        SessionRepository::update(&repo, &replacement).await.unwrap();

        let stored = SessionRepository::find_by_user_id(&repo, &user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.refresh_token, "second");
    }

    #[tokio::test]
    async fn test_touch_missing_session() {
        let repo = MemoryAuthRepository::new();
        let err = SessionRepository::touch(&repo, &SessionId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_delete_expired_removes_only_expired() {
        let repo = MemoryAuthRepository::new();
        let live_id = UserId::new();
        let dead_id = UserId::new();

        SessionRepository::create(&repo, &session(live_id, "live"))
            .await
            .unwrap();
        let dead = Session::new(
            dead_id,
            UserName::new("bob").unwrap(),
            "dead".to_string(),
            chrono::Duration::seconds(-1),
        );
        SessionRepository::create(&repo, &dead).await.unwrap();

        let removed = SessionRepository::delete_expired(&repo).await.unwrap();
        assert_eq!(removed, 1);
        assert!(
            SessionRepository::find_by_user_id(&repo, &live_id)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            SessionRepository::find_by_user_id(&repo, &dead_id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
