//! Role storage fixtures for unit tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use adminhub_core::UserId;

use crate::aggregator::{RoleStore, RoleStoreError};
use crate::permissions::Permission;
use crate::roles::Role;
use crate::subject::Subject;

pub fn subject() -> Subject {
    Subject::new(UserId::new(), "13800000000")
}

#[derive(Debug, Default)]
pub struct StaticRoleStore {
    definitions: HashMap<Role, BTreeSet<Permission>>,
    assignments: RwLock<HashMap<UserId, Vec<Role>>>,
}

impl StaticRoleStore {
    pub fn define<const N: usize>(mut self, role: &'static str, tokens: [Permission; N]) -> Self {
        self.definitions.insert(Role::from_static(role), tokens.into_iter().collect());
        self
    }

    pub fn assign<const N: usize>(self, user_id: UserId, roles: [&'static str; N]) -> Self {
        for role in roles {
            self.assign_in_place(user_id, role);
        }
        self
    }

    pub fn assign_in_place(&self, user_id: UserId, role: &'static str) {
        self.assignments
            .write()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(Role::from_static(role));
    }
}

impl RoleStore for StaticRoleStore {
    fn assigned_roles(&self, user_id: UserId) -> Result<Vec<Role>, RoleStoreError> {
        let map = self
            .assignments
            .read()
            .map_err(|_| RoleStoreError::Unavailable("poisoned".to_string()))?;
        Ok(map.get(&user_id).cloned().unwrap_or_default())
    }

    fn role_permissions(&self, role: &Role) -> Result<Option<BTreeSet<Permission>>, RoleStoreError> {
        Ok(self.definitions.get(role).cloned())
    }
}

/// Store whose backend is down.
#[derive(Debug, Default)]
pub struct UnavailableRoleStore;

impl RoleStore for UnavailableRoleStore {
    fn assigned_roles(&self, _user_id: UserId) -> Result<Vec<Role>, RoleStoreError> {
        Err(RoleStoreError::Unavailable("connection refused".to_string()))
    }

    fn role_permissions(&self, _role: &Role) -> Result<Option<BTreeSet<Permission>>, RoleStoreError> {
        Err(RoleStoreError::Unavailable("connection refused".to_string()))
    }
}
