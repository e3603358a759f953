use axum::{
    Router,
    routing::{MethodRouter, get, post, put},
};

use crate::authz;
use crate::operations as op;

pub mod menu;
pub mod roles;
pub mod system;
pub mod users;

/// Bind `route` to `operation`: the policy runs before the handler.
fn guarded(operation: &'static str, route: MethodRouter) -> MethodRouter {
    route.route_layer(axum::middleware::from_fn_with_state(operation, authz::enforce))
}

/// Router for every endpoint. Each route passes through its operation's policy.
pub fn router() -> Router {
    Router::new()
        .route("/health", guarded(op::HEALTH, get(system::health)))
        .route("/me", guarded(op::WHO_AM_I, get(system::who_am_i)))
        .route("/me/permissions", guarded(op::MY_PERMISSIONS, get(system::my_permissions)))
        .route("/me/info", guarded(op::UPDATE_USER_INFO, put(users::update_user_info)))
        .route("/menu", guarded(op::MENU, get(menu::menu)))
        .route(
            "/users",
            guarded(op::USERS, get(users::list)).merge(guarded(op::ADD_USER, post(users::create))),
        )
        .route("/users/page", guarded(op::USERS_PAGE, get(users::page)))
        .route("/users/:id", guarded(op::USER, get(users::get_user)))
        .route("/users/:id/roles", guarded(op::ASSIGN_ROLES, put(users::assign_roles)))
        .route("/events/users", guarded(op::USER_CREATED, get(users::user_created)))
        .route(
            "/roles",
            guarded(op::ROLES, get(roles::list)).merge(guarded(op::CREATE_ROLE, post(roles::create))),
        )
        .route("/roles/:name/permissions", guarded(op::GRANT_PERMISSIONS, post(roles::grant)))
        .route("/permissions", guarded(op::PERMISSIONS, get(roles::permissions)))
}
