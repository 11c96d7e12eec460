//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and application services
//! - `token` - Bearer credential issuance and validation
//! - `infra/` - Store implementations (MongoDB, in-memory)
//! - `presentation/` - HTTP handlers, DTOs, router, guards
//!
//! ## Features
//! - User registration and login with email + password
//! - Short-lived access credentials, long-lived refresh credentials (JWT HS256)
//! - One active server-side session per user, replaced on re-login
//! - Forced logout: deleting the session revokes unexpired credentials
//! - Role-based access (User, Admin)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (PHC strings, salt + cost embedded)
//! - Signing algorithm pinned to HMAC-SHA-256, zero clock-skew leeway
//! - Guard rejections never reveal whether a credential was expired,
//!   forged, or revoked

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;
pub mod token;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::MemoryAuthRepository;
pub use infra::mongo::MongoAuthRepository;
pub use presentation::router::{auth_router, auth_router_generic};
pub use token::{Claims, TokenService};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
