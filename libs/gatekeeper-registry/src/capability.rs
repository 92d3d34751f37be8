//! Capabilities a provider can fulfil.

use std::fmt;

/// The kind of service a registered provider offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapabilityKind {
    /// Credential verification.
    AuthN,
    /// Authorization decisions.
    AuthZ,
    /// Authorization policy configuration source.
    AuthZConfig,
}

impl CapabilityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthN => "authn",
            Self::AuthZ => "authz",
            Self::AuthZConfig => "authz_config",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-level marker binding a [`CapabilityKind`] to its provider trait object.
///
/// SDK crates declare one marker per provider trait, e.g.
///
/// ```ignore
/// pub struct AuthNCapability;
///
/// impl Capability for AuthNCapability {
///     type Provider = dyn AuthenticationProvider;
///     const KIND: CapabilityKind = CapabilityKind::AuthN;
/// }
/// ```
pub trait Capability: 'static {
    type Provider: ?Sized + Send + Sync + 'static;
    const KIND: CapabilityKind;
}
