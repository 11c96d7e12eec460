//! Application Configuration
//!
//! Configuration for the Auth application layer. Read-only after startup;
//! shared across request handlers behind an `Arc`.

use std::time::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA-256 signing key. The default is insecure and for
    /// development only; deployments must set `JWT_SECRET`.
    pub jwt_secret: String,
    /// Access credential TTL (15 minutes)
    pub access_ttl: Duration,
    /// Refresh credential TTL (7 days)
    pub refresh_ttl: Duration,
    /// Server-side session TTL (7 days)
    pub session_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "your-super-secret-jwt-key-here".to_string(),
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),
            session_ttl: Duration::from_secs(7 * 24 * 3600),
        }
    }
}

impl AuthConfig {
    /// Session TTL as a chrono duration for timestamp arithmetic
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl.as_secs() as i64)
    }
}
