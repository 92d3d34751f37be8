//! Registry errors. All of them are startup errors and fatal for the process.

use thiserror::Error;

use crate::capability::CapabilityKind;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// No provider with this name is registered for the capability.
    #[error("unknown {capability} provider '{name}'")]
    UnknownProvider {
        capability: CapabilityKind,
        name: String,
    },

    /// A provider with this name is already registered for the capability.
    #[error("{capability} provider '{name}' is already registered")]
    DuplicateProvider {
        capability: CapabilityKind,
        name: String,
    },

    /// The stored factory produces a different provider type than requested.
    #[error("{capability} provider '{name}' was registered with a different provider type")]
    CapabilityMismatch {
        capability: CapabilityKind,
        name: String,
    },

    /// The factory ran and failed.
    #[error("failed to construct {capability} provider '{name}': {source:#}")]
    Construction {
        capability: CapabilityKind,
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

impl RegistryError {
    /// Name of the provider the error is about.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        match self {
            Self::UnknownProvider { name, .. }
            | Self::DuplicateProvider { name, .. }
            | Self::CapabilityMismatch { name, .. }
            | Self::Construction { name, .. } => name,
        }
    }
}
