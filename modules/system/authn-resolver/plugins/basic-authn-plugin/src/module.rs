//! Registration of the HTTP Basic authentication provider.

use std::sync::Arc;

use authn_resolver_sdk::{AuthNCapability, AuthenticationProvider};
use gatekeeper_registry::{
    CapabilityKind, ProviderCtx, ProviderRegistration, ProviderRegistry, RegistryError,
};
use tracing::{info, warn};

use crate::config::BasicAuthConfig;
use crate::domain::Service;

/// Name the provider is registered under.
pub const PROVIDER_NAME: &str = "basic";

/// Build the provider from its `providers.basic` configuration section.
///
/// # Errors
/// Returns an error if the configuration or credentials file is invalid.
pub fn build(ctx: &ProviderCtx<'_>) -> anyhow::Result<Arc<dyn AuthenticationProvider>> {
    let cfg: BasicAuthConfig = ctx.provider_config()?;
    let service = Service::from_config(&cfg)?;

    if service.user_count() == 0 {
        warn!("Basic authn provider has no users configured; every request will be rejected");
    }
    info!(
        users = service.user_count(),
        credentials_file = ?cfg.credentials_file,
        "Basic authn provider initialized"
    );

    Ok(Arc::new(service))
}

/// Register the provider under [`PROVIDER_NAME`].
///
/// # Errors
/// Returns [`RegistryError::DuplicateProvider`] if the name is taken.
pub fn install(registry: &mut ProviderRegistry) -> Result<(), RegistryError> {
    registry.register::<AuthNCapability, _>(PROVIDER_NAME, build)
}

inventory::submit! {
    ProviderRegistration::new(PROVIDER_NAME, CapabilityKind::AuthN, install)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use authn_resolver_sdk::InMemoryCredentialRequest;
    use gatekeeper_registry::SystemConfig;
    use serde_json::json;

    #[tokio::test]
    async fn instantiate_from_system_config() {
        let mut registry = ProviderRegistry::new();
        install(&mut registry).unwrap();
        let system = SystemConfig::new().with_provider(
            PROVIDER_NAME,
            json!({ "users": [{ "username": "admin", "password": "admin", "user_id": "u-admin" }] }),
        );

        let provider = registry
            .instantiate::<AuthNCapability>(PROVIDER_NAME, &system)
            .unwrap();
        let req = InMemoryCredentialRequest::new().header("authorization", "Basic YWRtaW46YWRtaW4=");

        let result = provider.authenticate(&req).await.unwrap();
        assert_eq!(result.identity().unwrap().user_id(), "u-admin");
    }

    #[test]
    fn missing_credentials_file_fails_construction() {
        let mut registry = ProviderRegistry::new();
        install(&mut registry).unwrap();
        let system = SystemConfig::new().with_provider(
            PROVIDER_NAME,
            json!({ "credentials_file": "/definitely/not/here.htpasswd" }),
        );

        let err = registry
            .instantiate::<AuthNCapability>(PROVIDER_NAME, &system)
            .err()
            .unwrap();
        assert!(err.to_string().contains("failed to read credentials file"));
    }
}
