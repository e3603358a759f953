use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::sse::{Event as SseEvent, Sse},
};

use adminhub_auth::Subject;
use adminhub_core::{Page, PageArgs, UserId};
use adminhub_infra::{NewUserInput, UpdateUserInfo, UserRecord};

use crate::app::{dto::AssignRolesRequest, errors::ApiError, services::{self, AppServices}};

/// Every user, newest first.
pub async fn list(Extension(services): Extension<Arc<AppServices>>) -> Result<Json<Vec<UserRecord>>, ApiError> {
    Ok(Json(services.users().find_all()?))
}

/// `?pn=1&ps=10`
pub async fn page(
    Extension(services): Extension<Arc<AppServices>>,
    Query(args): Query<PageArgs>,
) -> Result<Json<Page<UserRecord>>, ApiError> {
    Ok(Json(services.users().users(args)?))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    let id: UserId = id.parse()?;
    Ok(Json(services.users().find_one_by_id(id)?))
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(input): Json<NewUserInput>,
) -> Result<(StatusCode, Json<UserRecord>), ApiError> {
    let user = services.users().create(input)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Updates the caller's own profile.
pub async fn update_user_info(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
    Json(input): Json<UpdateUserInfo>,
) -> Result<Json<UserRecord>, ApiError> {
    Ok(Json(services.users().update_user_info(subject.user_id, input)?))
}

pub async fn assign_roles(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<AssignRolesRequest>,
) -> Result<Json<UserRecord>, ApiError> {
    let id: UserId = id.parse()?;
    Ok(Json(services.directory.assign_roles(id, body.roles)?))
}

/// SSE stream of `user.created` notifications.
pub async fn user_created(
    Extension(services): Extension<Arc<AppServices>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    services::user_created_stream(&services)
}
