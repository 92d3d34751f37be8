use gatekeeper_registry::{Capability, CapabilityKind};

use crate::plugin_api::AuthenticationProvider;

/// Registry marker for authentication providers.
pub struct AuthNCapability;

impl Capability for AuthNCapability {
    type Provider = dyn AuthenticationProvider;
    const KIND: CapabilityKind = CapabilityKind::AuthN;
}
