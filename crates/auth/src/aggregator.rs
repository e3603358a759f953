//! Role resolution: subject → flattened token set.

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use adminhub_core::UserId;

use crate::permissions::Permission;
use crate::roles::Role;
use crate::subject::{Subject, SubjectPermissionSet};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleStoreError {
    #[error("role storage unavailable: {0}")]
    Unavailable(String),
}

/// Read access to role assignments and role definitions.
///
/// Implementations must tolerate concurrent readers; evaluation never writes.
pub trait RoleStore: Send + Sync {
    /// Roles currently assigned to a user, in assignment order.
    fn assigned_roles(&self, user_id: UserId) -> Result<Vec<Role>, RoleStoreError>;

    /// Tokens a role grants, or `None` if no such role is defined.
    fn role_permissions(&self, role: &Role) -> Result<Option<BTreeSet<Permission>>, RoleStoreError>;
}

impl<S> RoleStore for Arc<S>
where
    S: RoleStore + ?Sized,
{
    fn assigned_roles(&self, user_id: UserId) -> Result<Vec<Role>, RoleStoreError> {
        (**self).assigned_roles(user_id)
    }

    fn role_permissions(&self, role: &Role) -> Result<Option<BTreeSet<Permission>>, RoleStoreError> {
        (**self).role_permissions(role)
    }
}

/// Builds a [`SubjectPermissionSet`] from the subject's current roles.
///
/// Every call reads storage again; nothing is memoized between evaluations.
#[derive(Debug, Clone)]
pub struct RoleAggregator<S> {
    store: S,
}

impl<S: RoleStore> RoleAggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve the subject's granted tokens.
    ///
    /// A reference to an undefined role grants nothing. Any storage error
    /// aborts resolution; callers must treat it as a denial.
    pub fn resolve(&self, subject: &Subject) -> Result<SubjectPermissionSet, RoleStoreError> {
        let roles = self.store.assigned_roles(subject.user_id)?;

        let mut granted = SubjectPermissionSet::empty();
        for role in &roles {
            match self.store.role_permissions(role)? {
                Some(tokens) => granted.extend(tokens),
                None => tracing::warn!(
                    user_id = %subject.user_id,
                    role = %role,
                    "assigned role is not defined; it grants nothing"
                ),
            }
        }

        tracing::trace!(user_id = %subject.user_id, roles = roles.len(), tokens = granted.len(), "roles resolved");
        Ok(granted)
    }
}
