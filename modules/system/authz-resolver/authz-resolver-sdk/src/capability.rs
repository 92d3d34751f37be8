use gatekeeper_registry::{Capability, CapabilityKind};

use crate::plugin_api::{AuthorizationConfigProvider, AuthorizationProvider};

/// Registry marker for decision providers.
pub struct AuthZCapability;

impl Capability for AuthZCapability {
    type Provider = dyn AuthorizationProvider;
    const KIND: CapabilityKind = CapabilityKind::AuthZ;
}

/// Registry marker for authorization configuration sources.
pub struct AuthZConfigCapability;

impl Capability for AuthZConfigCapability {
    type Provider = dyn AuthorizationConfigProvider;
    const KIND: CapabilityKind = CapabilityKind::AuthZConfig;
}
