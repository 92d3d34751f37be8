//! Service implementation for the static token authentication provider.

use std::collections::HashMap;

use authn_resolver_sdk::CredentialSource;
use gatekeeper_security::Identity;

use crate::config::{AuthNMode, IdentityConfig, StaticTokenConfig};

/// Static token authentication service.
///
/// Provides token-to-identity mapping based on configuration mode:
/// - `accept_all`: Any non-empty token maps to the default identity
/// - `static_tokens`: Specific tokens map to specific identities
pub struct Service {
    mode: AuthNMode,
    source: CredentialSource,
    default_identity: Identity,
    token_map: HashMap<String, Identity>,
}

impl Service {
    /// Create a service from provider configuration.
    ///
    /// # Errors
    /// Returns an error if a token is empty or mapped more than once.
    pub fn from_config(cfg: &StaticTokenConfig) -> anyhow::Result<Self> {
        let mut token_map = HashMap::with_capacity(cfg.tokens.len());
        for mapping in &cfg.tokens {
            if mapping.token.trim().is_empty() {
                anyhow::bail!(
                    "empty token configured for user '{}'",
                    mapping.identity.user_id
                );
            }
            if token_map
                .insert(mapping.token.clone(), build_identity(&mapping.identity))
                .is_some()
            {
                anyhow::bail!(
                    "token configured more than once (last for user '{}')",
                    mapping.identity.user_id
                );
            }
        }

        Ok(Self {
            mode: cfg.mode,
            source: cfg.source.clone(),
            default_identity: build_identity(&cfg.default_identity),
            token_map,
        })
    }

    #[must_use]
    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// Map a token to its identity.
    ///
    /// Returns `None` if the token is not recognized (in `static_tokens` mode)
    /// or empty.
    #[must_use]
    pub fn authenticate(&self, token: &str) -> Option<Identity> {
        if token.is_empty() {
            return None;
        }

        match self.mode {
            AuthNMode::AcceptAll => Some(self.default_identity.clone()),
            AuthNMode::StaticTokens => self.token_map.get(token).cloned(),
        }
    }
}

fn build_identity(cfg: &IdentityConfig) -> Identity {
    let builder = Identity::builder(cfg.user_id.clone()).databases(cfg.databases.clone());
    match &cfg.tenant {
        Some(tenant) => builder.tenant(tenant.clone()).build(),
        None => builder.build(),
    }
}
