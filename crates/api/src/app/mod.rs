//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: directories, enforcement pipeline, menu, realtime channel
//! - `routes/`: HTTP routes + handlers, each bound to a named operation
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use adminhub_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config)?;
    Ok(router(services))
}

/// Router over already wired services.
pub fn router(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        jwt: Arc::clone(&services.jwt),
        users: Arc::clone(services.users()),
    };

    routes::router()
        .layer(
            ServiceBuilder::new()
                .layer(Extension(services))
                .layer(axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware)),
        )
}
