//! Call-time permission enforcement.

use crate::aggregator::{RoleAggregator, RoleStore};
use crate::error::AuthzError;
use crate::expression::PermissionExpression;
use crate::subject::{Subject, SubjectPermissionSet};

/// Checks a declared requirement against a subject's current grants.
///
/// - No declared requirement: any authenticated subject is allowed.
/// - Declared requirement: allowed only if satisfied; anything that prevents
///   evaluation (e.g. role storage failing) is a denial.
///
/// Never mutates the subject or the resolved set.
#[derive(Debug, Clone)]
pub struct PermissionGuard<S> {
    aggregator: RoleAggregator<S>,
}

impl<S: RoleStore> PermissionGuard<S> {
    pub fn new(aggregator: RoleAggregator<S>) -> Self {
        Self { aggregator }
    }

    pub fn aggregator(&self) -> &RoleAggregator<S> {
        &self.aggregator
    }

    pub fn check(&self, required: Option<&PermissionExpression>, subject: &Subject) -> Result<(), AuthzError> {
        let Some(required) = required else {
            return Ok(());
        };

        let granted = self.permissions_of(subject)?;
        if required.satisfies(&granted) {
            Ok(())
        } else {
            Err(AuthzError::Forbidden)
        }
    }

    /// Fresh token set for a subject; storage failures become `Forbidden`.
    pub fn permissions_of(&self, subject: &Subject) -> Result<SubjectPermissionSet, AuthzError> {
        self.aggregator.resolve(subject).map_err(|e| {
            tracing::warn!(user_id = %subject.user_id, error = %e, "role resolution failed; denying");
            AuthzError::Forbidden
        })
    }
}
