//! Registration of the static token authentication provider.

use std::sync::Arc;

use authn_resolver_sdk::{AuthNCapability, AuthenticationProvider};
use gatekeeper_registry::{
    CapabilityKind, ProviderCtx, ProviderRegistration, ProviderRegistry, RegistryError,
};
use tracing::{info, warn};

use crate::config::{AuthNMode, StaticTokenConfig};
use crate::domain::Service;

/// Name the provider is registered under.
pub const PROVIDER_NAME: &str = "static_token";

/// Build the provider from its `providers.static_token` configuration section.
///
/// # Errors
/// Returns an error if the configuration is invalid.
pub fn build(ctx: &ProviderCtx<'_>) -> anyhow::Result<Arc<dyn AuthenticationProvider>> {
    info!("Initializing static_token authn provider");

    let cfg: StaticTokenConfig = ctx.provider_config()?;
    if cfg.mode == AuthNMode::AcceptAll {
        warn!(
            "Static token provider is running in `accept_all` mode: \
             every non-empty token is accepted with a hardcoded identity. \
             Do NOT use this mode in production."
        );
    }

    info!(
        mode = ?cfg.mode,
        source = %cfg.source.kind,
        key = %cfg.source.key,
        token_count = cfg.tokens.len(),
        "Loaded provider configuration"
    );

    Ok(Arc::new(Service::from_config(&cfg)?))
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
    use tracing_test::traced_test;

    #[test]
    fn inventory_contains_registration() {
        let registry = ProviderRegistry::from_inventory().unwrap();
        assert!(registry.contains(CapabilityKind::AuthN, PROVIDER_NAME));
    }

    #[tokio::test]
    async fn instantiate_from_system_config() {
        let mut registry = ProviderRegistry::new();
        install(&mut registry).unwrap();
        let system = SystemConfig::new().with_provider(
            PROVIDER_NAME,
            json!({
                "mode": "static_tokens",
                "tokens": [
                    { "token": "t-admin", "identity": { "user_id": "admin", "tenant": "default_tenant" } }
                ]
            }),
        );

        let provider = registry
            .instantiate::<AuthNCapability>(PROVIDER_NAME, &system)
            .unwrap();
        let req = InMemoryCredentialRequest::new().header("authorization", "Bearer t-admin");
        let result = provider.authenticate(&req).await.unwrap();

        let identity = result.identity().unwrap();
        assert_eq!(identity.user_id(), "admin");
        assert_eq!(identity.tenant(), Some("default_tenant"));
    }

    #[test]
    #[traced_test]
    fn accept_all_mode_warns() {
        let mut registry = ProviderRegistry::new();
        install(&mut registry).unwrap();

        let provider = registry.instantiate::<AuthNCapability>(PROVIDER_NAME, &SystemConfig::new());
        assert!(provider.is_ok());
        assert!(logs_contain("accept_all"));
    }

    #[test]
    fn unknown_config_field_fails_construction() {
        let mut registry = ProviderRegistry::new();
        install(&mut registry).unwrap();
        let system = SystemConfig::new().with_provider(PROVIDER_NAME, json!({ "vendor": "x" }));

        let err = registry
            .instantiate::<AuthNCapability>(PROVIDER_NAME, &system)
            .err()
            .unwrap();
        assert!(matches!(err, RegistryError::Construction { .. }));
    }
}
