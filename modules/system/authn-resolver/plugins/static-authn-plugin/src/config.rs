//! Configuration for the static token authentication provider.

use authn_resolver_sdk::CredentialSource;
use serde::Deserialize;

/// User id returned in `accept_all` mode unless configured otherwise.
pub const DEFAULT_USER_ID: &str = "default_user";

/// Provider configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticTokenConfig {
    /// Authentication mode.
    pub mode: AuthNMode,

    /// Where the token is read from. Defaults to `Authorization: Bearer <token>`.
    pub source: CredentialSource,

    /// Identity returned in `accept_all` mode.
    pub default_identity: IdentityConfig,

    /// Static token-to-identity mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,
}

impl Default for StaticTokenConfig {
    fn default() -> Self {
        Self {
            mode: AuthNMode::AcceptAll,
            source: CredentialSource::default(),
            default_identity: IdentityConfig::default(),
            tokens: Vec::new(),
        }
    }
}

/// Authentication mode.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthNMode {
    /// Accept any non-empty token and return the default identity.
    #[default]
    AcceptAll,
    /// Map specific tokens to specific identities.
    StaticTokens,
}

/// Identity configuration for a user.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    pub user_id: String,
    pub tenant: Option<String>,
    pub databases: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_owned(),
            tenant: None,
            databases: Vec::new(),
        }
    }
}

/// Maps a static token to a specific identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The token value to match.
    pub token: String,
    /// The identity to return when this token is presented.
    pub identity: IdentityConfig,
}
