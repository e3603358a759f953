use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use adminhub_core::{DomainError, DomainResult, RoleId};

use crate::permissions::Permission;

/// Role name used for RBAC.
///
/// Subjects reference roles by name; what a role grants lives in its
/// [`RoleDefinition`], held by role storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A role and the tokens it grants. Shared by every subject assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub id: RoleId,
    pub name: Role,
    pub describe: Option<String>,
    pub permissions: BTreeSet<Permission>,
}

impl RoleDefinition {
    pub fn new(name: Role) -> Self {
        Self {
            id: RoleId::new(),
            name,
            describe: None,
            permissions: BTreeSet::new(),
        }
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }

    pub fn grants(&self, token: &Permission) -> bool {
        self.permissions.contains(token)
    }
}

/// Input for creating a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoleInput {
    pub name: String,
    #[serde(default)]
    pub describe: Option<String>,
}

impl NewRoleInput {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        Ok(())
    }

    pub fn into_definition(self) -> DomainResult<RoleDefinition> {
        self.validate()?;
        let mut role = RoleDefinition::new(Role::new(self.name.trim().to_string()));
        role.describe = self.describe.filter(|d| !d.trim().is_empty());
        Ok(role)
    }
}
