//! Session Entity
//!
//! Server-side record proving that a user's refresh credential has not
//! been revoked. At most one session exists per user; a new login
//! replaces the previous one.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{user_id::SessionId, user_id::UserId, user_name::UserName};

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID, server-generated at creation
    pub id: SessionId,
    /// Reference to the owning user; unique across active sessions
    pub user_id: UserId,
    /// Denormalized copy of the user name, kept for audit lookups.
    /// Read-only: a username change must invalidate the session.
    pub username: UserName,
    /// The refresh credential bound to this session
    pub refresh_token: String,
    /// Inactive sessions are unusable regardless of expiry
    pub is_active: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Expiry; `created_at + ttl`
    pub expires_at: DateTime<Utc>,
    /// Last refresh or admin touch
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Create a new active session
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user_id: UserId, username: UserName, refresh_token: String, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: SessionId::new(),
            user_id,
            username,
            refresh_token,
            is_active: true,
            created_at: now,
            expires_at: now + ttl,
            last_activity: now,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Active and not expired
    pub fn is_usable(&self) -> bool {
        self.is_active && !self.is_expired()
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}
