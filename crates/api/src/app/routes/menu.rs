use std::sync::Arc;

use axum::{Json, extract::Extension};

use adminhub_auth::{MenuNode, Subject};

use crate::app::{errors::ApiError, services::AppServices};
use crate::{authz, operations as op};

/// Navigation tree pruned to what the caller may see.
pub async fn menu(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(subject): Extension<Subject>,
) -> Result<Json<Vec<MenuNode>>, ApiError> {
    let granted = authz::permissions_of(&services, op::MENU, &subject).await?;
    Ok(Json(services.menu.visible_to(&granted)))
}
