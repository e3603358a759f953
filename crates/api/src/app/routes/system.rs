use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode};
use serde_json::json;

use adminhub_auth::Subject;
use adminhub_infra::UserProfile;

use crate::app::{errors::ApiError, services::AppServices};
use crate::{authz, operations as op};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The caller's own directory record with role details.
pub async fn who_am_i(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(services.directory.profile(subject.user_id)?))
}

/// Tokens the caller currently holds, sorted.
pub async fn my_permissions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let granted = authz::permissions_of(&services, op::MY_PERMISSIONS, &subject).await?;

    Ok(Json(json!({
        "user_id": subject.user_id.to_string(),
        "permissions": granted,
    })))
}
