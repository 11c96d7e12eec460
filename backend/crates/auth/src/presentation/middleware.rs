//! Auth Guards
//!
//! Middleware converting a request's bearer credential into a typed
//! [`Principal`] or a rejection. Server-side revocation wins over token
//! validity: a syntactically valid, unexpired credential is still
//! rejected once the user's session is gone or inactive.
//!
//! Every rejection is the same opaque 401; clients cannot tell an
//! expired credential from a forged one or a revoked session.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header, request::Parts};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::domain::repository::SessionRepository;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};
use crate::token::TokenService;

/// Authenticated identity attached to an in-flight request
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: UserId,
    pub email: Email,
    pub role: UserRole,
}

/// Guard middleware state
#[derive(Clone)]
pub struct AuthGuardState<R>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenService>,
}

/// Middleware that requires a valid bearer credential and a live session
pub async fn require_auth<R>(
    State(state): State<AuthGuardState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    let principal = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Middleware that additionally requires the admin role
pub async fn require_admin<R>(
    State(state): State<AuthGuardState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    let principal = authenticate(&state, req.headers()).await?;

    if !principal.role.is_admin() {
        return Err(AuthError::Forbidden);
    }

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Middleware that attaches a principal when the credential checks out
/// but lets the request through anonymously on any failure
pub async fn optional_auth<R>(
    State(state): State<AuthGuardState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    if let Ok(principal) = authenticate(&state, req.headers()).await {
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}

/// Shared guard steps: bearer extraction, credential validation, session
/// existence and liveness.
async fn authenticate<R>(state: &AuthGuardState<R>, headers: &HeaderMap) -> AuthResult<Principal>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    let token = extract_bearer(headers).ok_or(AuthError::Unauthorized)?;

    let claims = state
        .tokens
        .validate(token)
        .map_err(|_| AuthError::Unauthorized)?;

    let user_id: UserId = claims.user_id.parse().map_err(|_| AuthError::Unauthorized)?;

    let session = state
        .repo
        .find_by_user_id(&user_id)
        .await?
        .ok_or(AuthError::Unauthorized)?;

    if !session.is_usable() {
        return Err(AuthError::Unauthorized);
    }

    Ok(Principal {
        user_id,
        email: Email::from_stored(claims.email),
        role: claims.role,
    })
}

/// Extract the bearer credential: the header must be `Bearer` followed by
/// exactly one token separated by a single space.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

impl<S> axum::extract::FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AuthError::Unauthorized)
    }
}

/// Extractor for routes behind [`optional_auth`]: `None` means anonymous
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<Principal>);

impl<S> axum::extract::FromRequestParts<S> for MaybePrincipal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybePrincipal(parts.extensions.get::<Principal>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_bearer_well_formed() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_bearer_missing_header() {
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }

    #[test]
    fn test_extract_bearer_no_token() {
        assert_eq!(extract_bearer(&headers_with_auth("Bearer")), None);
        assert_eq!(extract_bearer(&headers_with_auth("Bearer ")), None);
    }

    #[test]
    fn test_extract_bearer_two_tokens() {
        assert_eq!(extract_bearer(&headers_with_auth("Bearer x y")), None);
    }

    #[test]
    fn test_extract_bearer_wrong_scheme() {
        assert_eq!(extract_bearer(&headers_with_auth("Basic abc")), None);
        assert_eq!(extract_bearer(&headers_with_auth("bearer abc")), None);
    }
}
