//! Authentication prerequisite for guarded operations.

use crate::error::AuthzError;
use crate::subject::Subject;

/// Per-request authentication state, filled in by the transport layer.
///
/// Credentials are validated upstream; this only records whether that
/// produced a subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    subject: Option<Subject>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { subject: None }
    }

    pub fn authenticated(subject: Subject) -> Self {
        Self {
            subject: Some(subject),
        }
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }
}

/// Admits a request only if it carries a subject.
///
/// Runs before any permission check: without a subject there is no
/// permission set to evaluate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthenticationGate;

impl AuthenticationGate {
    pub fn admit<'a>(&self, context: &'a RequestContext) -> Result<&'a Subject, AuthzError> {
        context.subject().ok_or(AuthzError::Unauthenticated)
    }
}
