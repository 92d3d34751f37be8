//! Provider implementation for the static token authentication service.
//!
//! Implements `AuthenticationProvider` using the domain service.

use async_trait::async_trait;
use authn_resolver_sdk::{
    AuthNError, AuthenticationProvider, AuthenticationResult, CredentialRequest,
};

use super::service::Service;

#[async_trait]
impl AuthenticationProvider for Service {
    async fn authenticate(
        &self,
        request: &dyn CredentialRequest,
    ) -> Result<AuthenticationResult, AuthNError> {
        let Some(token) = self.source().extract(request)? else {
            return Ok(AuthenticationResult::rejected());
        };
        Ok(self.authenticate(&token).into())
    }
}
