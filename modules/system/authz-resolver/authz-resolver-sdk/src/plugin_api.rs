//! Provider traits for authorization implementations.

use async_trait::async_trait;
use gatekeeper_security::AuthorizationContext;

use crate::error::{AuthZProviderError, AuthzConfigError};
use crate::models::AuthzConfiguration;

/// Decides whether a user may perform an action on a resource.
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    /// Return `true` to allow and `false` to deny.
    ///
    /// A normal denial is `Ok(false)`, never an error.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` / `Internal` when no decision could be made
    async fn authorize(&self, context: &AuthorizationContext) -> Result<bool, AuthZProviderError>;
}

/// Source of users and role grants for policy-based decision providers.
///
/// Called at provider construction and on explicit reload, never per request.
pub trait AuthorizationConfigProvider: Send + Sync {
    /// Load the current configuration.
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or parsed.
    fn configuration(&self) -> Result<AuthzConfiguration, AuthzConfigError>;
}
