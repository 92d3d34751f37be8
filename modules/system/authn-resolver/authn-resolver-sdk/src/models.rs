//! Domain models for authentication.

use gatekeeper_security::Identity;

/// Outcome of an authentication attempt.
///
/// A successful result always carries an identity and an unsuccessful one
/// never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    identity: Option<Identity>,
}

impl AuthenticationResult {
    #[must_use]
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    #[must_use]
    pub fn rejected() -> Self {
        Self { identity: None }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn into_identity(self) -> Option<Identity> {
        self.identity
    }
}

impl From<Option<Identity>> for AuthenticationResult {
    fn from(identity: Option<Identity>) -> Self {
        Self { identity }
    }
}
