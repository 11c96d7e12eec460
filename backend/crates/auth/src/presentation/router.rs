//! Auth Router
//!
//! Builds the `/api/v1` route tree: public auth endpoints, guarded
//! logout/profile, and the admin-only role update.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::infra::mongo::MongoAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthGuardState, require_admin, require_auth};
use crate::token::TokenService;

/// Create the auth router with the MongoDB repository
pub fn auth_router(repo: MongoAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create the auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let tokens = Arc::new(TokenService::from_config(&config));

    let state = AuthAppState {
        repo: repo.clone(),
        tokens: tokens.clone(),
        config: Arc::new(config),
    };

    let guard = AuthGuardState { repo, tokens };

    let public = Router::new()
        .route("/auth/register", post(handlers::register::<R>))
        .route("/auth/login", post(handlers::login::<R>))
        .route("/auth/refresh", post(handlers::refresh::<R>));

    let protected = Router::new()
        .route("/auth/logout", post(handlers::logout::<R>))
        .route("/users/profile", get(handlers::profile::<R>))
        .layer(axum_middleware::from_fn_with_state(
            guard.clone(),
            require_auth::<R>,
        ));

    let admin = Router::new()
        .route("/users/{id}/role", put(handlers::update_role::<R>))
        .layer(axum_middleware::from_fn_with_state(
            guard,
            require_admin::<R>,
        ));

    Router::new().nest("/api/v1", public.merge(protected).merge(admin).with_state(state))
}
