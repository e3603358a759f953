//! Service wiring: directories, the enforcement pipeline, the menu and the
//! realtime channel.

use std::{convert::Infallible, sync::Arc, time::Duration};

use anyhow::Context;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use adminhub_auth::{
    AccessControl, Hs256JwtValidator, JwtValidator, MenuTree, PermissionCatalog, PermissionGuard, RoleAggregator,
};
use adminhub_events::{Event, EventBus};
use adminhub_infra::{AdminDirectory, AppConfig, RoleService, UserCreated, UserEvents, UserService};

use crate::operations;

pub struct AppServices {
    pub directory: AdminDirectory,
    pub access: Arc<AccessControl<AdminDirectory>>,
    pub menu: MenuTree,
    pub jwt: Arc<dyn JwtValidator>,
    pub role_lookup_timeout: Duration,
    realtime_tx: broadcast::Sender<UserCreated>,
}

impl AppServices {
    pub fn users(&self) -> &Arc<UserService> {
        self.directory.users()
    }

    pub fn roles(&self) -> &Arc<RoleService> {
        self.directory.roles()
    }
}

/// Wire everything from `config`.
///
/// Fails on any configuration error (operation registry, menu tree, role
/// grants) so a misconfigured process never starts serving.
pub fn build_services(config: &AppConfig) -> anyhow::Result<Arc<AppServices>> {
    let catalog = PermissionCatalog::admin_console();
    let mode = config.token_validation;

    let bus = Arc::new(UserEvents::new());
    let users = Arc::new(UserService::in_memory(Arc::clone(&bus)));
    let roles = Arc::new(RoleService::in_memory(catalog.clone(), mode));
    let directory = AdminDirectory::new(users, roles);

    directory.roles().seed_admin().context("failed to seed admin role")?;
    if let Some(phone) = &config.bootstrap_admin_phone {
        let admin = directory
            .bootstrap_admin(phone)
            .context("failed to bootstrap admin user")?;
        tracing::info!(user_id = %admin.id, "bootstrap admin ready");
    }

    let registry = operations::registry(&catalog, mode).context("invalid operation registry")?;
    let access = Arc::new(AccessControl::new(
        registry,
        PermissionGuard::new(RoleAggregator::new(directory.clone())),
    ));

    let menu = load_menu(config, &catalog)?;

    // Realtime channel (SSE): lossy broadcast fed from the owned user bus.
    let (realtime_tx, _realtime_rx) = broadcast::channel::<UserCreated>(256);
    spawn_realtime_bridge(&bus, realtime_tx.clone())?;

    Ok(Arc::new(AppServices {
        directory,
        access,
        menu,
        jwt: Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes())),
        role_lookup_timeout: config.role_lookup_timeout,
        realtime_tx,
    }))
}

fn load_menu(config: &AppConfig, catalog: &PermissionCatalog) -> anyhow::Result<MenuTree> {
    let Some(path) = &config.menu_path else {
        return MenuTree::admin_console().context("invalid built-in menu");
    };

    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read menu {}", path.display()))?;
    MenuTree::from_json(&raw, catalog, config.token_validation)
        .with_context(|| format!("invalid menu {}", path.display()))
}

/// Forward bus notifications to the async broadcast channel.
///
/// The bus subscription blocks, so it lives on its own thread; the thread
/// ends once the bus is dropped.
fn spawn_realtime_bridge(bus: &Arc<UserEvents>, realtime_tx: broadcast::Sender<UserCreated>) -> anyhow::Result<()> {
    let sub = bus.subscribe();

    std::thread::Builder::new()
        .name("user-events-bridge".to_string())
        .spawn(move || {
            while let Ok(event) = sub.recv() {
                // Lossy; no subscribers is fine.
                let _ = realtime_tx.send(event);
            }
            tracing::debug!("user event bus closed; realtime bridge stopped");
        })
        .context("failed to spawn realtime bridge")?;

    Ok(())
}

pub fn user_created_stream(
    services: &AppServices,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>> + use<>> {
    let rx = services.realtime_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(event.event_type()).data(data)))
        }
        // Lagged receivers skip what they missed.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
