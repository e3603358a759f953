use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use adminhub_auth::{JwtValidator, RequestContext};
use adminhub_core::DomainError;
use adminhub_infra::UserService;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    pub users: Arc<UserService>,
}

/// Attach a [`RequestContext`] to every request.
///
/// Never rejects: a missing or invalid token, or a token for a user that no
/// longer exists, yields an anonymous context and the per-operation gate
/// decides what that means.
pub async fn auth_middleware(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let context = match extract_bearer(req.headers()) {
        Some(token) => resolve(&state, token),
        None => RequestContext::anonymous(),
    };

    req.extensions_mut().insert(context);
    next.run(req).await
}

fn resolve(state: &AuthState, token: &str) -> RequestContext {
    let claims = match state.jwt.validate(token, Utc::now()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "bearer token rejected");
            return RequestContext::anonymous();
        }
    };

    match state.users.find_one_by_id(claims.sub) {
        Ok(user) => RequestContext::authenticated(user.subject()),
        Err(DomainError::NotFound) => {
            tracing::debug!(user_id = %claims.sub, "token subject is not a known user");
            RequestContext::anonymous()
        }
        Err(err) => {
            tracing::warn!(user_id = %claims.sub, error = %err, "user lookup failed");
            RequestContext::anonymous()
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();

    if token.is_empty() { None } else { Some(token) }
}
