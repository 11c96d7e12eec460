//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, LogoutUseCase, ProfileUseCase, RefreshUseCase, RegisterInput,
    RegisterUseCase,
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, MessageResponse, RefreshRequest, RegisterRequest, RoleUpdateRequest,
    TokenPairResponse, UserResponse,
};
use crate::presentation::middleware::Principal;
use crate::token::TokenService;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/v1/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone());

    let user = use_case
        .execute(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "user": UserResponse::from(&user) })),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/v1/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<TokenPairResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(TokenPairResponse {
        user: UserResponse::from(&output.user),
        access_token: output.access_token,
        refresh_token: output.refresh_token,
    }))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/v1/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<TokenPairResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = RefreshUseCase::new(state.repo.clone(), state.tokens.clone());

    let output = use_case.execute(req.refresh_token).await?;

    Ok(Json(TokenPairResponse {
        user: UserResponse::from(&output.user),
        access_token: output.access_token,
        refresh_token: output.refresh_token,
    }))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/v1/auth/logout (requires auth)
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    principal: Principal,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = LogoutUseCase::new(state.repo.clone());
    use_case.execute(&principal.user_id).await?;

    Ok(Json(MessageResponse {
        message: "successfully logged out".to_string(),
    }))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/v1/users/profile (requires auth)
pub async fn profile<R>(
    State(state): State<AuthAppState<R>>,
    principal: Principal,
) -> AuthResult<Json<serde_json::Value>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone());
    let user = use_case.get(&principal.user_id).await?;

    Ok(Json(
        serde_json::json!({ "user": UserResponse::from(&user) }),
    ))
}

/// PUT /api/v1/users/{id}/role (requires admin)
pub async fn update_role<R>(
    State(state): State<AuthAppState<R>>,
    _principal: Principal,
    Path(id): Path<String>,
    Json(req): Json<RoleUpdateRequest>,
) -> AuthResult<Json<serde_json::Value>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let user_id: UserId = id
        .parse()
        .map_err(|_| AuthError::Validation("invalid user id".to_string()))?;

    let use_case = ProfileUseCase::new(state.repo.clone());
    let user = use_case.set_role(&user_id, &req.role).await?;

    Ok(Json(
        serde_json::json!({ "user": UserResponse::from(&user) }),
    ))
}
