//! The enforcement pipeline: registry lookup → gate → guard.

use crate::aggregator::RoleStore;
use crate::error::AuthzError;
use crate::gate::{AuthenticationGate, RequestContext};
use crate::guard::PermissionGuard;
use crate::operations::OperationRegistry;
use crate::subject::{Subject, SubjectPermissionSet};

/// Single enforcement point consulted before an operation body runs.
#[derive(Debug, Clone)]
pub struct AccessControl<S> {
    registry: OperationRegistry,
    gate: AuthenticationGate,
    guard: PermissionGuard<S>,
}

impl<S: RoleStore> AccessControl<S> {
    pub fn new(registry: OperationRegistry, guard: PermissionGuard<S>) -> Self {
        Self {
            registry,
            gate: AuthenticationGate,
            guard,
        }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn guard(&self) -> &PermissionGuard<S> {
        &self.guard
    }

    /// Decide whether `operation` may run in `context`.
    ///
    /// Returns the admitted subject (`None` for an anonymous call to a public
    /// operation). Operations missing from the registry are denied.
    pub fn authorize(&self, operation: &str, context: &RequestContext) -> Result<Option<Subject>, AuthzError> {
        let Some(policy) = self.registry.policy(operation) else {
            tracing::warn!(operation, "operation is not registered; denying");
            return Err(AuthzError::Forbidden);
        };

        if !policy.is_authenticated() {
            return Ok(context.subject().cloned());
        }

        let subject = self.gate.admit(context).inspect_err(|_| {
            tracing::debug!(operation, "rejected unauthenticated call");
        })?;

        self.guard
            .check(policy.requirement(), subject)
            .inspect_err(|_| {
                tracing::info!(operation, user_id = %subject.user_id, "permission denied");
            })?;

        Ok(Some(subject.clone()))
    }

    /// Current grants of an authenticated caller (menu rendering, self-inspection).
    pub fn permissions_of(&self, context: &RequestContext) -> Result<SubjectPermissionSet, AuthzError> {
        let subject = self.gate.admit(context)?;
        self.guard.permissions_of(subject)
    }
}
