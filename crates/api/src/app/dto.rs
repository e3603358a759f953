use serde::Deserialize;

use adminhub_auth::{Permission, Role};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AssignRolesRequest {
    pub roles: Vec<Role>,
}

#[derive(Debug, Deserialize)]
pub struct GrantPermissionsRequest {
    pub permissions: Vec<Permission>,
}
