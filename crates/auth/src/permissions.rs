use std::borrow::{Borrow, Cow};
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthzError;
use crate::expression::PermissionExpression;

/// Permission token: one atomic capability.
///
/// Tokens are opaque strings compared exactly (case- and format-sensitive),
/// e.g. `"USER_SELECT"`. Nothing is inferred from their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
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

impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tokens and requirements of the admin console.
///
/// The `*_PAGE` strings are the textual requirements shared by the
/// navigation menu and the operations backing each page.
pub mod admin {
    use super::Permission;

    pub const USER_CREATE: Permission = Permission::from_static("USER_CREATE");
    pub const USER_SELECT: Permission = Permission::from_static("USER_SELECT");
    pub const ROLE_CREATE: Permission = Permission::from_static("ROLE_CREATE");
    pub const ROLE_SELECT: Permission = Permission::from_static("ROLE_SELECT");
    pub const PERMISSION_CREATE: Permission = Permission::from_static("PERMISSION_CREATE");
    pub const PERMISSION_SELECT: Permission = Permission::from_static("PERMISSION_SELECT");

    pub const ALL: [Permission; 6] = [
        USER_CREATE,
        USER_SELECT,
        ROLE_CREATE,
        ROLE_SELECT,
        PERMISSION_CREATE,
        PERMISSION_SELECT,
    ];

    pub const USER_PAGE: &str = "USER_CREATE | USER_SELECT";
    pub const ROLE_PAGE: &str = "ROLE_CREATE | ROLE_SELECT";
    pub const PERMISSION_PAGE: &str = "PERMISSION_CREATE | PERMISSION_SELECT";
    pub const USER_GROUP: &str =
        "USER_CREATE | USER_SELECT | ROLE_CREATE | ROLE_SELECT | PERMISSION_CREATE | PERMISSION_SELECT";
}

/// How configuration tokens are checked against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenValidation {
    /// Unknown tokens are a configuration error.
    #[default]
    Strict,
    /// Any non-empty token is accepted.
    Permissive,
}

impl FromStr for TokenValidation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            other => Err(format!("unknown token validation mode '{other}' (expected strict|permissive)")),
        }
    }
}

/// Canonical registry of the tokens the system knows about.
///
/// Consulted while loading configuration (operation policies, menu trees,
/// role grants), never during call-time evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionCatalog {
    known: BTreeSet<Permission>,
}

impl PermissionCatalog {
    pub fn new(tokens: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            known: tokens.into_iter().collect(),
        }
    }

    /// Catalog of the admin console tokens.
    pub fn admin_console() -> Self {
        Self::new(admin::ALL)
    }

    pub fn contains(&self, token: &Permission) -> bool {
        self.known.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.known.iter()
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    pub fn check_token(&self, token: &Permission, mode: TokenValidation) -> Result<(), AuthzError> {
        match mode {
            TokenValidation::Permissive => Ok(()),
            TokenValidation::Strict if self.contains(token) => Ok(()),
            TokenValidation::Strict => Err(AuthzError::malformed(format!(
                "unknown permission token '{token}'"
            ))),
        }
    }

    pub fn check(&self, expression: &PermissionExpression, mode: TokenValidation) -> Result<(), AuthzError> {
        expression
            .tokens()
            .iter()
            .try_for_each(|token| self.check_token(token, mode))
    }
}
