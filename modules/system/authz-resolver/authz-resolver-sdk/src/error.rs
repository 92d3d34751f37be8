//! Error types for authorization.

use thiserror::Error;

/// Failures of a decision provider.
///
/// These represent infrastructure failures only. Access denial is
/// expressed as `Ok(false)` from
/// [`AuthorizationProvider::authorize`](crate::AuthorizationProvider::authorize),
/// not as an error variant.
#[derive(Debug, Error)]
pub enum AuthZProviderError {
    /// The policy backend could not be reached.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failures of an authorization configuration source.
#[derive(Debug, Error)]
pub enum AuthzConfigError {
    #[error("failed to read authorization config '{origin}': {source}")]
    Read {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid authorization config '{origin}': {message}")]
    Invalid { origin: String, message: String },
}

/// Outcome of an authorization check that must stop the guarded operation.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// The decision provider refused the `(user, resource, action)` triple.
    #[error("Unauthorized: user '{user}' may not '{action}' on '{resource_type}'")]
    Denied {
        user: String,
        resource_type: String,
        action: String,
    },

    /// The decision provider failed; the operation is not executed.
    #[error("authorization evaluation failed: {0}")]
    Evaluation(#[from] AuthZProviderError),

    /// No request scope was active and the guard is configured to deny in
    /// that case.
    #[error("no request scope for '{operation}'")]
    MissingScope { operation: String },
}

/// A `"resource_type:action"` string that does not split into two parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed role action '{0}': expected 'resource_type:action'")]
pub struct RoleActionParseError(pub String);
