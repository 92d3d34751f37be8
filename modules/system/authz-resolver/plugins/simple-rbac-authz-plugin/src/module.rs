//! Registration of the RBAC decision provider and its configuration sources.

use std::sync::Arc;

use authz_resolver_sdk::{
    AuthZCapability, AuthZConfigCapability, AuthorizationConfigProvider, AuthorizationProvider,
    AuthzConfiguration,
};
use gatekeeper_registry::{
    CapabilityKind, ProviderCtx, ProviderRegistration, ProviderRegistry, RegistryError,
};
use tracing::info;

use crate::config::{LocalFileConfig, SimpleRbacConfig};
use crate::domain::{InlineConfigProvider, LocalFileConfigProvider, SimpleRbacAuthorizer};

/// Name of the RBAC decision provider.
pub const PROVIDER_NAME: &str = "simple_rbac";
/// Name of the file-backed configuration provider.
pub const LOCAL_CONFIG_PROVIDER_NAME: &str = "local_authz_config";
/// Name of the configuration provider reading its own `SystemConfig` section.
pub const INLINE_CONFIG_PROVIDER_NAME: &str = "inline_authz_config";

/// Build the RBAC provider, resolving its configuration source through the
/// registry.
///
/// # Errors
/// Returns an error if the configuration source is unknown or fails, or if
/// the loaded roles do not compile.
pub fn build(ctx: &ProviderCtx<'_>) -> anyhow::Result<Arc<dyn AuthorizationProvider>> {
    info!("Initializing simple_rbac authz provider");

    let cfg: SimpleRbacConfig = ctx.provider_config()?;
    let source = ctx.instantiate::<AuthZConfigCapability>(&cfg.config_provider)?;
    let authorizer = SimpleRbacAuthorizer::new(source)?;

    info!(
        config_provider = %cfg.config_provider,
        grants = authorizer.policy().len(),
        "Loaded provider configuration"
    );
    Ok(Arc::new(authorizer))
}

/// # Errors
/// Returns an error if `config_file` is missing from the section.
pub fn build_local_config(
    ctx: &ProviderCtx<'_>,
) -> anyhow::Result<Arc<dyn AuthorizationConfigProvider>> {
    let cfg: LocalFileConfig = ctx.provider_config()?;
    info!(config_file = %cfg.config_file.display(), "Using local authz config file");
    Ok(Arc::new(LocalFileConfigProvider::new(cfg.config_file)))
}

/// # Errors
/// Returns an error if the section is not a valid authorization configuration.
pub fn build_inline_config(
    ctx: &ProviderCtx<'_>,
) -> anyhow::Result<Arc<dyn AuthorizationConfigProvider>> {
    let cfg: AuthzConfiguration = ctx.provider_config()?;
    Ok(Arc::new(InlineConfigProvider::new(cfg)))
}

/// Register the RBAC decision provider.
///
/// # Errors
/// Returns [`RegistryError::DuplicateProvider`] if the name is taken.
pub fn install(registry: &mut ProviderRegistry) -> Result<(), RegistryError> {
    registry.register::<AuthZCapability, _>(PROVIDER_NAME, build)
}

/// # Errors
/// Returns [`RegistryError::DuplicateProvider`] if the name is taken.
pub fn install_local_config(registry: &mut ProviderRegistry) -> Result<(), RegistryError> {
    registry.register::<AuthZConfigCapability, _>(LOCAL_CONFIG_PROVIDER_NAME, build_local_config)
}

/// # Errors
/// Returns [`RegistryError::DuplicateProvider`] if the name is taken.
pub fn install_inline_config(registry: &mut ProviderRegistry) -> Result<(), RegistryError> {
    registry.register::<AuthZConfigCapability, _>(INLINE_CONFIG_PROVIDER_NAME, build_inline_config)
}

inventory::submit! {
    ProviderRegistration::new(PROVIDER_NAME, CapabilityKind::AuthZ, install)
}

inventory::submit! {
    ProviderRegistration::new(LOCAL_CONFIG_PROVIDER_NAME, CapabilityKind::AuthZConfig, install_local_config)
}

inventory::submit! {
    ProviderRegistration::new(INLINE_CONFIG_PROVIDER_NAME, CapabilityKind::AuthZConfig, install_inline_config)
}
