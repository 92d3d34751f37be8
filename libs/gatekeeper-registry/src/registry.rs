//! Name-keyed provider registry.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::capability::{Capability, CapabilityKind};
use crate::config::SystemConfig;
use crate::error::RegistryError;

/// Factory producing a provider for capability `P` from the running system.
pub type ProviderFactory<P> =
    Arc<dyn Fn(&ProviderCtx<'_>) -> anyhow::Result<Arc<P>> + Send + Sync>;

/// Everything a factory may consult while constructing its provider.
pub struct ProviderCtx<'a> {
    name: &'a str,
    config: &'a SystemConfig,
    registry: &'a ProviderRegistry,
}

impl<'a> ProviderCtx<'a> {
    /// Name the provider is being constructed under.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    #[must_use]
    pub fn config(&self) -> &'a SystemConfig {
        self.config
    }

    #[must_use]
    pub fn registry(&self) -> &'a ProviderRegistry {
        self.registry
    }

    /// Deserialize this provider's own configuration section.
    ///
    /// # Errors
    /// Returns an error if the section does not match `T`.
    pub fn provider_config<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(self.config.provider_config(self.name)?)
    }

    /// Construct another provider, e.g. a configuration source a decision
    /// provider depends on.
    ///
    /// # Errors
    /// See [`ProviderRegistry::instantiate`].
    pub fn instantiate<C: Capability>(
        &self,
        name: &str,
    ) -> Result<Arc<C::Provider>, RegistryError> {
        self.registry.instantiate::<C>(name, self.config)
    }
}

/// Registry of provider factories keyed by `(capability, name)`.
///
/// Populated at startup, then shared read-only (typically behind an `Arc`).
/// Registration takes `&mut self`, so once shared the registry cannot change.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<(CapabilityKind, String), Box<dyn Any + Send + Sync>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from every [`ProviderRegistration`] linked into the binary.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateProvider`] if two registrations share
    /// a name within one capability.
    pub fn from_inventory() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        let mut registrations: Vec<&ProviderRegistration> =
            inventory::iter::<ProviderRegistration>.into_iter().collect();
        registrations.sort_by_key(|r| (r.capability, r.name));

        for registration in registrations {
            (registration.install)(&mut registry)?;
            debug!(
                capability = %registration.capability,
                provider = registration.name,
                "Installed provider registration"
            );
        }

        info!(count = registry.len(), "Provider registry built");
        Ok(registry)
    }

    /// Register `factory` under `name` for capability `C`.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateProvider`] if the name is taken for `C`.
    pub fn register<C, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        C: Capability,
        F: Fn(&ProviderCtx<'_>) -> anyhow::Result<Arc<C::Provider>> + Send + Sync + 'static,
    {
        let name = name.into();
        let key = (C::KIND, name);
        if self.factories.contains_key(&key) {
            return Err(RegistryError::DuplicateProvider {
                capability: C::KIND,
                name: key.1,
            });
        }

        let factory: ProviderFactory<C::Provider> = Arc::new(factory);
        self.factories.insert(key, Box::new(factory));
        Ok(())
    }

    /// Look up the factory registered under `name` for capability `C`.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownProvider`] if nothing is registered.
    pub fn resolve<C: Capability>(
        &self,
        name: &str,
    ) -> Result<ProviderFactory<C::Provider>, RegistryError> {
        let entry = self
            .factories
            .get(&(C::KIND, name.to_owned()))
            .ok_or_else(|| RegistryError::UnknownProvider {
                capability: C::KIND,
                name: name.to_owned(),
            })?;

        entry
            .downcast_ref::<ProviderFactory<C::Provider>>()
            .cloned()
            .ok_or_else(|| RegistryError::CapabilityMismatch {
                capability: C::KIND,
                name: name.to_owned(),
            })
    }

    /// Resolve `name` and invoke its factory with `config`.
    ///
    /// # Errors
    /// Returns a resolution error, or [`RegistryError::Construction`] if the
    /// factory fails.
    pub fn instantiate<C: Capability>(
        &self,
        name: &str,
        config: &SystemConfig,
    ) -> Result<Arc<C::Provider>, RegistryError> {
        let factory = self.resolve::<C>(name)?;
        let ctx = ProviderCtx {
            name,
            config,
            registry: self,
        };

        let provider = factory(&ctx).map_err(|source| RegistryError::Construction {
            capability: C::KIND,
            name: name.to_owned(),
            source,
        })?;

        info!(capability = %C::KIND, provider = name, "Provider instantiated");
        Ok(provider)
    }

    #[must_use]
    pub fn contains(&self, kind: CapabilityKind, name: &str) -> bool {
        self.factories.contains_key(&(kind, name.to_owned()))
    }

    /// Registered names for one capability, sorted.
    #[must_use]
    pub fn names(&self, kind: CapabilityKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .factories
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, n)| n.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Link-time registration record submitted by plugin crates.
///
/// ```ignore
/// fn install(registry: &mut ProviderRegistry) -> Result<(), RegistryError> {
///     registry.register::<AuthNCapability, _>("static_token", build)
/// }
///
/// inventory::submit! {
///     ProviderRegistration::new("static_token", CapabilityKind::AuthN, install)
/// }
/// ```
pub struct ProviderRegistration {
    pub name: &'static str,
    pub capability: CapabilityKind,
    pub install: fn(&mut ProviderRegistry) -> Result<(), RegistryError>,
}

impl ProviderRegistration {
    #[must_use]
    pub const fn new(
        name: &'static str,
        capability: CapabilityKind,
        install: fn(&mut ProviderRegistry) -> Result<(), RegistryError>,
    ) -> Self {
        Self {
            name,
            capability,
            install,
        }
    }
}

inventory::collect!(ProviderRegistration);
