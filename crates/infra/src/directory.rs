//! The user and role directories seen together as authorization storage.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use adminhub_auth::{Permission, Role, RoleDefinition, RoleStore, RoleStoreError};
use adminhub_core::{DomainError, DomainResult, UserId};

use crate::roles::{ADMIN_ROLE, RoleService};
use crate::users::{NewUserInput, UserRecord, UserService};

/// A user record with its assigned roles' definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserRecord,
    /// Definitions of the assigned roles that still exist, in assignment order.
    pub role_details: Vec<RoleDefinition>,
}

/// Users, roles, and the [`RoleStore`] view over both.
#[derive(Debug, Clone)]
pub struct AdminDirectory {
    users: Arc<UserService>,
    roles: Arc<RoleService>,
}

impl AdminDirectory {
    pub fn new(users: Arc<UserService>, roles: Arc<RoleService>) -> Self {
        Self { users, roles }
    }

    pub fn users(&self) -> &Arc<UserService> {
        &self.users
    }

    pub fn roles(&self) -> &Arc<RoleService> {
        &self.roles
    }

    /// Replace a user's roles. Every name must refer to a defined role.
    pub fn assign_roles(&self, user_id: UserId, names: Vec<Role>) -> DomainResult<UserRecord> {
        for name in &names {
            if self.roles.get(name)?.is_none() {
                return Err(DomainError::validation(format!("unknown role '{name}'")));
            }
        }
        self.users.assign_roles(user_id, names)
    }

    pub fn profile(&self, user_id: UserId) -> DomainResult<UserProfile> {
        let user = self.users.find_one_by_id(user_id)?;
        let role_details = self.roles.find_by_names(&user.roles)?;
        Ok(UserProfile { user, role_details })
    }

    /// Seed the admin role and make `phone` an administrator, creating the
    /// user if needed.
    pub fn bootstrap_admin(&self, phone: &str) -> DomainResult<UserRecord> {
        self.roles.seed_admin()?;

        let user = match self.users.find_one_by_phone(phone) {
            Ok(user) => user,
            Err(DomainError::NotFound) => self.users.create(NewUserInput {
                phone: phone.to_string(),
            })?,
            Err(err) => return Err(err),
        };

        let mut roles = user.roles.clone();
        roles.push(ADMIN_ROLE);
        self.users.assign_roles(user.id, roles)
    }
}

fn unavailable(err: DomainError) -> RoleStoreError {
    RoleStoreError::Unavailable(err.to_string())
}

impl RoleStore for AdminDirectory {
    fn assigned_roles(&self, user_id: UserId) -> Result<Vec<Role>, RoleStoreError> {
        match self.users.assigned_roles(user_id) {
            Ok(roles) => Ok(roles),
            // A subject that vanished from the directory holds nothing.
            Err(DomainError::NotFound) => Ok(Vec::new()),
            Err(err) => Err(unavailable(err)),
        }
    }

    fn role_permissions(&self, role: &Role) -> Result<Option<BTreeSet<Permission>>, RoleStoreError> {
        self.roles
            .get(role)
            .map(|found| found.map(|definition| definition.permissions))
            .map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminhub_auth::{NewRoleInput, PermissionCatalog, RoleAggregator, Subject, TokenValidation, admin};

    use crate::users::UserEvents;

    fn directory() -> AdminDirectory {
        AdminDirectory::new(
            Arc::new(UserService::in_memory(Arc::new(UserEvents::new()))),
            Arc::new(RoleService::in_memory(
                PermissionCatalog::admin_console(),
                TokenValidation::Strict,
            )),
        )
    }

    #[test]
    fn bootstrap_admin_grants_the_whole_catalog() {
        let dir = directory();
        let admin_user = dir.bootstrap_admin("13800000000").unwrap();

        let granted = RoleAggregator::new(dir.clone()).resolve(&admin_user.subject()).unwrap();
        assert_eq!(granted.len(), admin::ALL.len());

        // Running it again keeps a single assignment.
        let again = dir.bootstrap_admin("13800000000").unwrap();
        assert_eq!(again.id, admin_user.id);
        assert_eq!(again.roles, vec![ADMIN_ROLE]);
    }

    #[test]
    fn assigning_an_unknown_role_is_rejected() {
        let dir = directory();
        let user = dir
            .users()
            .create(NewUserInput {
                phone: "1".to_string(),
            })
            .unwrap();

        let err = dir.assign_roles(user.id, vec![Role::from_static("ghost")]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn role_changes_are_seen_by_the_next_resolution() {
        let dir = directory();
        let user = dir
            .users()
            .create(NewUserInput {
                phone: "2".to_string(),
            })
            .unwrap();
        let viewer = dir
            .roles()
            .create(NewRoleInput {
                name: "viewer".to_string(),
                describe: None,
            })
            .unwrap();

        let aggregator = RoleAggregator::new(dir.clone());
        let subject = user.subject();
        assert!(aggregator.resolve(&subject).unwrap().is_empty());

        dir.assign_roles(user.id, vec![viewer.name.clone()]).unwrap();
        dir.roles().grant(&viewer.name, [admin::USER_SELECT]).unwrap();

        assert!(aggregator.resolve(&subject).unwrap().contains(&admin::USER_SELECT));
    }

    #[test]
    fn profile_carries_role_definitions_in_assignment_order() {
        let dir = directory();
        let user = dir.bootstrap_admin("3").unwrap();
        let viewer = dir
            .roles()
            .create(NewRoleInput {
                name: "viewer".to_string(),
                describe: Some("read only".to_string()),
            })
            .unwrap();
        dir.assign_roles(user.id, vec![viewer.name.clone(), ADMIN_ROLE]).unwrap();

        let profile = dir.profile(user.id).unwrap();
        let names: Vec<Role> = profile.role_details.iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, vec![viewer.name.clone(), ADMIN_ROLE]);
        assert_eq!(profile.role_details[0].describe.as_deref(), Some("read only"));
        assert_eq!(profile.role_details[1].permissions.len(), admin::ALL.len());

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["phone"], "3");
        assert_eq!(json["roles"], serde_json::json!(["viewer", "admin"]));
        assert_eq!(json["role_details"][0]["name"], "viewer");
    }

    #[test]
    fn profile_of_unknown_user_is_not_found() {
        assert_eq!(directory().profile(UserId::new()).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn unknown_subject_resolves_to_nothing() {
        let dir = directory();
        let ghost = Subject::new(UserId::new(), "000");
        assert!(RoleAggregator::new(dir).resolve(&ghost).unwrap().is_empty());
    }
}
