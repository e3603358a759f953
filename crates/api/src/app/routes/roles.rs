use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};
use serde_json::json;

use adminhub_auth::{NewRoleInput, Role, RoleDefinition};

use crate::app::{dto::GrantPermissionsRequest, errors::ApiError, services::AppServices};

pub async fn list(Extension(services): Extension<Arc<AppServices>>) -> Result<Json<Vec<RoleDefinition>>, ApiError> {
    Ok(Json(services.roles().list()?))
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(input): Json<NewRoleInput>,
) -> Result<(StatusCode, Json<RoleDefinition>), ApiError> {
    let role = services.roles().create(input)?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn grant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
    Json(body): Json<GrantPermissionsRequest>,
) -> Result<Json<RoleDefinition>, ApiError> {
    let role = services.roles().grant(&Role::new(name), body.permissions)?;
    Ok(Json(role))
}

/// The permission catalog.
pub async fn permissions(Extension(services): Extension<Arc<AppServices>>) -> Json<serde_json::Value> {
    let tokens: Vec<&str> = services.roles().catalog().iter().map(|p| p.as_str()).collect();
    Json(json!({ "permissions": tokens }))
}
