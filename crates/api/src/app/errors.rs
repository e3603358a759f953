use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use adminhub_auth::AuthzError;
use adminhub_core::DomainError;

/// Handler error, rendered as `{"error": code, "message": ...}`.
///
/// Authorization failures never describe the missing permissions.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Authz(err) => authz_error_to_response(err),
            ApiError::Domain(err) => domain_error_to_response(err),
        }
    }
}

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    match err {
        AuthzError::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "authentication required")
        }
        AuthzError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "permission denied"),
        AuthzError::MalformedExpression(msg) => {
            tracing::error!(error = %msg, "malformed permission expression at call time");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::AlreadyExists(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unavailable(msg) => {
            tracing::warn!(error = %msg, "store unavailable");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "unavailable", "service unavailable")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_failures_map_to_401_and_403() {
        assert_eq!(ApiError::from(AuthzError::Unauthenticated).into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthzError::Forbidden).into_response().status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::from(AuthzError::malformed("x")).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_failures_map_to_client_errors() {
        let status = |err: DomainError| ApiError::from(err).into_response().status();
        assert_eq!(status(DomainError::validation("bad")), StatusCode::BAD_REQUEST);
        assert_eq!(status(DomainError::invalid_id("bad")), StatusCode::BAD_REQUEST);
        assert_eq!(status(DomainError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status(DomainError::already_exists("dup")), StatusCode::CONFLICT);
        assert_eq!(status(DomainError::unavailable("down")), StatusCode::SERVICE_UNAVAILABLE);
    }
}
