//! Provider trait for authentication implementations.
//!
//! Plugins implement this trait and register a factory for it in the
//! provider registry under [`AuthNCapability`](crate::AuthNCapability).

use async_trait::async_trait;

use crate::credentials::CredentialRequest;
use crate::error::AuthNError;
use crate::models::AuthenticationResult;

/// Verifies the credentials carried by a request.
#[async_trait]
pub trait AuthenticationProvider: Send + Sync {
    /// Authenticate the request and return the verified identity.
    ///
    /// Missing or invalid credentials yield [`AuthenticationResult::rejected`].
    ///
    /// # Errors
    ///
    /// - `Credential` if the transport cannot supply the credential kind the
    ///   provider reads
    /// - `Unavailable` / `Internal` when verification itself failed
    async fn authenticate(
        &self,
        request: &dyn CredentialRequest,
    ) -> Result<AuthenticationResult, AuthNError>;
}
