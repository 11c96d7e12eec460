//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer; tests run against the in-memory fake.

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::{
    email::Email, user_id::SessionId, user_id::UserId, user_name::UserName,
};
use crate::error::AuthResult;

/// User repository trait
///
/// Uniqueness of `email` and `username` is enforced by the store;
/// a duplicate insert fails with [`crate::AuthError::UserExists`].
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email (verbatim match)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by user name (verbatim match)
    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>>;

    /// Update user; bumps `updated_at`
    async fn update(&self, user: &User) -> AuthResult<()>;
}

/// Session repository trait
///
/// The store keeps at most one session per user (unique index on the
/// user id). A duplicate insert fails with
/// [`crate::AuthError::SessionExists`]; the caller replaces via `update`.
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find the session for a user
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Session>>;

    /// Find a session by the denormalized user name
    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Session>>;

    /// Replace the session matched by `session.user_id` (the stored id
    /// is kept); bumps `last_activity`
    async fn update(&self, session: &Session) -> AuthResult<()>;

    /// Set `last_activity = now` on a session
    async fn touch(&self, session_id: &SessionId) -> AuthResult<()>;

    /// Delete a user's session. Deleting a non-existent session succeeds.
    async fn delete_by_user_id(&self, user_id: &UserId) -> AuthResult<()>;

    /// Remove all sessions with `expires_at < now`; returns the count
    async fn delete_expired(&self) -> AuthResult<u64>;
}
