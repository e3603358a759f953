//! Explicit per-operation authorization policy.
//!
//! Every operation registers its policy at startup. The registry is validated
//! once while building and read-only afterwards.

use std::borrow::{Borrow, Cow};
use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::error::AuthzError;
use crate::expression::PermissionExpression;
use crate::permissions::{PermissionCatalog, TokenValidation};

/// Stable operation name (e.g. `"usersPage"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OperationId(Cow<'static, str>);

impl OperationId {
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

impl Borrow<str> for OperationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OperationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an operation requires of its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPolicy {
    authenticated: bool,
    requirement: Option<PermissionExpression>,
}

impl OperationPolicy {
    /// Raw constructor; prefer the named ones below.
    pub fn new(authenticated: bool, requirement: Option<PermissionExpression>) -> Self {
        Self {
            authenticated,
            requirement,
        }
    }

    /// No gate, no requirement.
    pub fn public() -> Self {
        Self::new(false, None)
    }

    /// Any authenticated subject.
    pub fn authenticated() -> Self {
        Self::new(true, None)
    }

    /// Authenticated subject satisfying `requirement`.
    pub fn requires(requirement: PermissionExpression) -> Self {
        Self::new(true, Some(requirement))
    }

    /// Same as [`requires`](Self::requires) from the textual form.
    pub fn requires_str(raw: &str) -> Result<Self, AuthzError> {
        PermissionExpression::parse(raw).map(Self::requires)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn requirement(&self) -> Option<&PermissionExpression> {
        self.requirement.as_ref()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("operation '{0}' is registered more than once")]
    Duplicate(OperationId),

    #[error("operation '{0}' declares a permission requirement without authentication")]
    GuardWithoutGate(OperationId),

    #[error("operation '{operation}': {source}")]
    Expression {
        operation: OperationId,
        #[source]
        source: AuthzError,
    },
}

/// Collects registrations; [`build`](Self::build) validates them.
#[derive(Debug, Default)]
pub struct OperationRegistryBuilder {
    entries: Vec<(OperationId, OperationPolicy)>,
}

impl OperationRegistryBuilder {
    pub fn register(mut self, operation: OperationId, policy: OperationPolicy) -> Self {
        self.entries.push((operation, policy));
        self
    }

    /// Validate and freeze the registry.
    ///
    /// Rejects duplicate names, requirements declared without an
    /// authentication gate, and (under [`TokenValidation::Strict`]) tokens
    /// missing from the catalog.
    pub fn build(self, catalog: &PermissionCatalog, mode: TokenValidation) -> Result<OperationRegistry, RegistryError> {
        let mut policies = HashMap::with_capacity(self.entries.len());

        for (operation, policy) in self.entries {
            if let Some(requirement) = policy.requirement() {
                if !policy.is_authenticated() {
                    return Err(RegistryError::GuardWithoutGate(operation));
                }
                if let Err(source) = catalog.check(requirement, mode) {
                    return Err(RegistryError::Expression { operation, source });
                }
            }

            if policies.contains_key(&operation) {
                return Err(RegistryError::Duplicate(operation));
            }
            policies.insert(operation, policy);
        }

        Ok(OperationRegistry { policies })
    }
}

/// Frozen lookup table from operation name to policy.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    policies: HashMap<OperationId, OperationPolicy>,
}

impl OperationRegistry {
    pub fn builder() -> OperationRegistryBuilder {
        OperationRegistryBuilder::default()
    }

    pub fn policy(&self, operation: &str) -> Option<&OperationPolicy> {
        self.policies.get(operation)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OperationId, &OperationPolicy)> {
        self.policies.iter()
    }
}
