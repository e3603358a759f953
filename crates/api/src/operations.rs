//! Operation names and their registered policies.

use adminhub_auth::{
    OperationId, OperationPolicy, OperationRegistry, PermissionCatalog, RegistryError, TokenValidation, admin,
};

pub const HEALTH: &str = "health";
pub const WHO_AM_I: &str = "whoAmI";
pub const MY_PERMISSIONS: &str = "myPermissions";
pub const MENU: &str = "menu";

pub const USERS: &str = "users";
pub const USERS_PAGE: &str = "usersPage";
pub const USER: &str = "user";
pub const ADD_USER: &str = "addUser";
pub const UPDATE_USER_INFO: &str = "updateUserInfo";
pub const ASSIGN_ROLES: &str = "assignRoles";
pub const USER_CREATED: &str = "userCreated";

pub const ROLES: &str = "roles";
pub const CREATE_ROLE: &str = "createRole";
pub const GRANT_PERMISSIONS: &str = "grantPermissions";
pub const PERMISSIONS: &str = "permissions";

/// Registry of every operation the API exposes.
///
/// Built once at startup; an unknown token (under strict validation) or a
/// requirement without authentication aborts startup.
pub fn registry(catalog: &PermissionCatalog, mode: TokenValidation) -> Result<OperationRegistry, RegistryError> {
    let requires = |operation: &'static str, raw: &str| {
        OperationPolicy::requires_str(raw).map_err(|source| RegistryError::Expression {
            operation: OperationId::from_static(operation),
            source,
        })
    };

    OperationRegistry::builder()
        .register(OperationId::from_static(HEALTH), OperationPolicy::public())
        .register(OperationId::from_static(WHO_AM_I), OperationPolicy::authenticated())
        .register(OperationId::from_static(MY_PERMISSIONS), OperationPolicy::authenticated())
        .register(OperationId::from_static(MENU), OperationPolicy::authenticated())
        .register(OperationId::from_static(UPDATE_USER_INFO), OperationPolicy::authenticated())
        .register(OperationId::from_static(USERS), requires(USERS, admin::USER_PAGE)?)
        .register(OperationId::from_static(USERS_PAGE), requires(USERS_PAGE, admin::USER_SELECT.as_str())?)
        .register(OperationId::from_static(USER), requires(USER, admin::USER_SELECT.as_str())?)
        .register(OperationId::from_static(ADD_USER), requires(ADD_USER, admin::USER_CREATE.as_str())?)
        .register(OperationId::from_static(ASSIGN_ROLES), requires(ASSIGN_ROLES, admin::ROLE_CREATE.as_str())?)
        .register(OperationId::from_static(USER_CREATED), requires(USER_CREATED, admin::USER_SELECT.as_str())?)
        .register(OperationId::from_static(ROLES), requires(ROLES, admin::ROLE_PAGE)?)
        .register(OperationId::from_static(CREATE_ROLE), requires(CREATE_ROLE, admin::ROLE_CREATE.as_str())?)
        .register(
            OperationId::from_static(GRANT_PERMISSIONS),
            requires(GRANT_PERMISSIONS, admin::PERMISSION_CREATE.as_str())?,
        )
        .register(OperationId::from_static(PERMISSIONS), requires(PERMISSIONS, admin::PERMISSION_PAGE)?)
        .build(catalog, mode)
}
