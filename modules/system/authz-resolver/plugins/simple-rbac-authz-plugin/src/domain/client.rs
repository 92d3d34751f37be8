//! Client implementation for the RBAC authorization provider.
//!
//! Implements `AuthorizationProvider` using the domain service.

use async_trait::async_trait;
use authz_resolver_sdk::{AuthZProviderError, AuthorizationProvider};
use gatekeeper_security::AuthorizationContext;

use super::service::SimpleRbacAuthorizer;

#[async_trait]
impl AuthorizationProvider for SimpleRbacAuthorizer {
    async fn authorize(&self, context: &AuthorizationContext) -> Result<bool, AuthZProviderError> {
        let allowed = self.is_allowed(context);
        tracing::debug!(
            user_id = %context.user.id,
            resource_type = %context.resource.resource_type,
            action = %context.action.id,
            allowed,
            "RBAC decision"
        );
        Ok(allowed)
    }
}
