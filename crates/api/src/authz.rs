//! Per-operation enforcement at the HTTP boundary.
//!
//! Role lookups are synchronous storage reads; they run on the blocking pool
//! under the configured timeout. A timeout or a failed lookup is a denial.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Extension, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use adminhub_auth::{AuthzError, RequestContext, Subject, SubjectPermissionSet};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Decide whether `operation` may run for `context`.
pub async fn authorize(
    services: &Arc<AppServices>,
    operation: &'static str,
    context: &RequestContext,
) -> Result<Option<Subject>, AuthzError> {
    let access = Arc::clone(&services.access);
    let context = context.clone();

    bounded(services.role_lookup_timeout, operation, move || access.authorize(operation, &context)).await
}

/// Current grants of an admitted subject, read fresh from storage.
pub async fn permissions_of(
    services: &Arc<AppServices>,
    operation: &'static str,
    subject: &Subject,
) -> Result<SubjectPermissionSet, AuthzError> {
    let access = Arc::clone(&services.access);
    let context = RequestContext::authenticated(subject.clone());

    bounded(services.role_lookup_timeout, operation, move || access.permissions_of(&context)).await
}

async fn bounded<T, F>(limit: Duration, operation: &'static str, f: F) -> Result<T, AuthzError>
where
    F: FnOnce() -> Result<T, AuthzError> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(f);

    match tokio::time::timeout(limit, task).await {
        Ok(Ok(decision)) => decision,
        Ok(Err(err)) => {
            tracing::error!(operation, error = %err, "authorization task failed; denying");
            Err(AuthzError::Forbidden)
        }
        Err(_) => {
            tracing::warn!(operation, "role lookup timed out; denying");
            Err(AuthzError::Forbidden)
        }
    }
}

/// Route layer: run the operation's policy before the handler (and its
/// extractors) see the request. The admitted [`Subject`] is added to the
/// request extensions.
pub async fn enforce(
    State(operation): State<&'static str>,
    Extension(services): Extension<Arc<AppServices>>,
    mut req: Request,
    next: Next,
) -> Response {
    let context = req.extensions().get::<RequestContext>().cloned().unwrap_or_default();

    match authorize(&services, operation, &context).await {
        Ok(subject) => {
            if let Some(subject) = subject {
                req.extensions_mut().insert(subject);
            }
            next.run(req).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}
