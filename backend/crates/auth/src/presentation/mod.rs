//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and guard middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{AuthGuardState, Principal, optional_auth, require_admin, require_auth};
pub use router::{auth_router, auth_router_generic};
