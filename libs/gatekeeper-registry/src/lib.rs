#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Gatekeeper provider registry.
//!
//! Providers for authentication, authorization decisions and authorization
//! configuration are registered under a `(capability, name)` key and resolved
//! once at startup. The resolved factory is invoked with the running
//! [`SystemConfig`] to produce a singleton provider.
//!
//! ```ignore
//! use gatekeeper_registry::{ProviderRegistry, SystemConfig};
//!
//! let registry = ProviderRegistry::from_inventory()?;
//! let authn = registry.instantiate::<AuthNCapability>("static_token", &system)?;
//! ```

pub mod capability;
pub mod config;
pub mod error;
pub mod registry;

pub use capability::{Capability, CapabilityKind};
pub use config::{ConfigError, SystemConfig};
pub use error::RegistryError;
pub use registry::{ProviderCtx, ProviderFactory, ProviderRegistration, ProviderRegistry};
