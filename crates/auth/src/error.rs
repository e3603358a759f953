//! Authorization error model.

use thiserror::Error;

/// Outcome of a failed authorization step.
///
/// Every variant is terminal for the current evaluation. The call-time
/// variants carry no detail: a rejected caller learns *that* it was rejected,
/// never which token would have been accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Bad requirement configuration. Only produced while loading
    /// configuration, never while evaluating a call.
    #[error("malformed permission expression: {0}")]
    MalformedExpression(String),

    /// No authenticated subject.
    #[error("unauthenticated")]
    Unauthenticated,

    /// A subject is present but the requirement is not met (or could not be
    /// evaluated).
    #[error("forbidden")]
    Forbidden,
}

impl AuthzError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedExpression(msg.into())
    }
}
