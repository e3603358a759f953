//! `adminhub-auth`: declarative permission authorization (zero-trust).
//!
//! Decoupled from HTTP and storage. The pieces, leaves first:
//!
//! - [`PermissionExpression`]: `"A | B"` requirements with OR semantics.
//! - [`SubjectPermissionSet`]: the tokens a subject holds for one evaluation.
//! - [`RoleAggregator`]: flattens role assignments from a [`RoleStore`].
//! - [`AuthenticationGate`] then [`PermissionGuard`]: the call-time checks.
//! - [`OperationRegistry`] / [`AccessControl`]: explicit per-operation policy.
//! - [`filter_menu`]: navigation pruning with the same expression semantics.

pub mod access;
pub mod aggregator;
pub mod claims;
pub mod error;
pub mod expression;
pub mod gate;
pub mod guard;
pub mod jwt;
pub mod menu;
pub mod operations;
pub mod permissions;
pub mod roles;
pub mod subject;

#[cfg(test)]
pub(crate) mod testing;

pub use access::AccessControl;
pub use aggregator::{RoleAggregator, RoleStore, RoleStoreError};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use error::AuthzError;
pub use expression::{ALLOW_EMPTY_EXPRESSION, DELIMITER, PermissionExpression};
pub use gate::{AuthenticationGate, RequestContext};
pub use guard::PermissionGuard;
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use menu::{MenuConfigError, MenuNode, MenuTree, filter_menu};
pub use operations::{OperationId, OperationPolicy, OperationRegistry, OperationRegistryBuilder, RegistryError};
pub use permissions::{Permission, PermissionCatalog, TokenValidation, admin};
pub use roles::{NewRoleInput, Role, RoleDefinition};
pub use subject::{Subject, SubjectPermissionSet};
