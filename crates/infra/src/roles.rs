//! Role directory: role definitions and the tokens they grant.

use std::sync::{Arc, Mutex};

use adminhub_auth::{NewRoleInput, Permission, PermissionCatalog, Role, RoleDefinition, TokenValidation};
use adminhub_core::{DomainError, DomainResult};

use crate::store::{InMemoryStore, KeyValueStore};

/// Bootstrap role holding every catalog token.
pub const ADMIN_ROLE: Role = Role::from_static("admin");

/// Role definitions keyed by name.
///
/// Grants are checked against the catalog with the configured
/// [`TokenValidation`] mode.
pub struct RoleService {
    store: Arc<dyn KeyValueStore<Role, RoleDefinition>>,
    catalog: PermissionCatalog,
    mode: TokenValidation,
    writes: Mutex<()>,
}

impl core::fmt::Debug for RoleService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RoleService")
            .field("catalog", &self.catalog)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl RoleService {
    pub fn new(
        store: Arc<dyn KeyValueStore<Role, RoleDefinition>>,
        catalog: PermissionCatalog,
        mode: TokenValidation,
    ) -> Self {
        Self {
            store,
            catalog,
            mode,
            writes: Mutex::new(()),
        }
    }

    pub fn in_memory(catalog: PermissionCatalog, mode: TokenValidation) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), catalog, mode)
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    pub fn create(&self, input: NewRoleInput) -> DomainResult<RoleDefinition> {
        let role = input.into_definition()?;

        let _writes = self.lock_writes()?;
        if self.store.get(&role.name)?.is_some() {
            return Err(DomainError::already_exists("role already exists"));
        }
        self.store.upsert(role.name.clone(), role.clone())?;

        tracing::info!(role = %role.name, "role created");
        Ok(role)
    }

    /// Add tokens to an existing role. Nothing is granted if any token is rejected.
    pub fn grant(&self, name: &Role, tokens: impl IntoIterator<Item = Permission>) -> DomainResult<RoleDefinition> {
        let tokens: Vec<Permission> = tokens.into_iter().collect();
        for token in &tokens {
            self.catalog
                .check_token(token, self.mode)
                .map_err(|err| DomainError::validation(err.to_string()))?;
        }

        let _writes = self.lock_writes()?;
        let mut role = self.store.get(name)?.ok_or(DomainError::NotFound)?;
        role.permissions.extend(tokens);
        self.store.upsert(role.name.clone(), role.clone())?;

        tracing::info!(role = %role.name, permissions = role.permissions.len(), "role permissions granted");
        Ok(role)
    }

    pub fn get(&self, name: &Role) -> DomainResult<Option<RoleDefinition>> {
        self.store.get(name)
    }

    /// Definitions for the given names, in the given order. Unknown names are skipped.
    pub fn find_by_names(&self, names: &[Role]) -> DomainResult<Vec<RoleDefinition>> {
        let mut found = Vec::with_capacity(names.len());
        for name in names {
            if let Some(role) = self.store.get(name)? {
                found.push(role);
            }
        }
        Ok(found)
    }

    /// Every role, by name.
    pub fn list(&self) -> DomainResult<Vec<RoleDefinition>> {
        let mut roles = self.store.list()?;
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    /// Ensure [`ADMIN_ROLE`] exists and grants the whole catalog.
    pub fn seed_admin(&self) -> DomainResult<RoleDefinition> {
        let created = self.create(NewRoleInput {
            name: ADMIN_ROLE.to_string(),
            describe: Some("Full access to the admin console".to_string()),
        });
        match created {
            Ok(_) | Err(DomainError::AlreadyExists(_)) => {}
            Err(err) => return Err(err),
        }

        self.grant(&ADMIN_ROLE, self.catalog.iter().cloned())
    }

    fn lock_writes(&self) -> DomainResult<std::sync::MutexGuard<'_, ()>> {
        self.writes
            .lock()
            .map_err(|_| DomainError::unavailable("role directory lock poisoned"))
    }
}
