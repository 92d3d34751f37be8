//! Service implementation for the HTTP Basic authentication provider.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use gatekeeper_security::Identity;
use secrecy::{ExposeSecret, SecretString};

use crate::config::{BasicAuthConfig, BasicUser};

struct Account {
    password: SecretString,
    identity: Identity,
}

/// Verifies `base64(username:password)` credentials against configured users.
pub struct Service {
    accounts: HashMap<String, Account>,
}

impl Service {
    /// Create a service from provider configuration.
    ///
    /// # Errors
    /// Returns an error if the credentials file cannot be read or is
    /// malformed, or if a username is configured twice.
    pub fn from_config(cfg: &BasicAuthConfig) -> anyhow::Result<Self> {
        let file_users = match &cfg.credentials_file {
            Some(path) => read_credentials_file(path)?,
            None => Vec::new(),
        };

        let mut accounts = HashMap::with_capacity(cfg.users.len() + file_users.len());
        for user in cfg.users.iter().chain(&file_users) {
            if user.username.is_empty() {
                anyhow::bail!("empty username configured");
            }
            let account = Account {
                password: SecretString::from(user.password.expose_secret().to_owned()),
                identity: build_identity(user),
            };
            if accounts.insert(user.username.clone(), account).is_some() {
                anyhow::bail!("user '{}' configured more than once", user.username);
            }
        }

        Ok(Self { accounts })
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.accounts.len()
    }

    /// Verify the base64 payload of a `Basic` authorization header.
    ///
    /// Returns `None` for undecodable payloads, payloads without a `:`
    /// separator, unknown users and wrong passwords.
    #[must_use]
    pub fn verify(&self, encoded: &str) -> Option<Identity> {
        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;

        let account = self.accounts.get(username)?;
        constant_time_eq(account.password.expose_secret().as_bytes(), password.as_bytes())
            .then(|| account.identity.clone())
    }
}

/// Byte comparison whose running time depends only on the input lengths.
fn constant_time_eq(expected: &[u8], given: &[u8]) -> bool {
    let diff = expected
        .iter()
        .zip(given)
        .fold(expected.len() ^ given.len(), |acc, (a, b)| acc | usize::from(a ^ b));
    diff == 0
}

fn build_identity(user: &BasicUser) -> Identity {
    let user_id = user.user_id.clone().unwrap_or_else(|| user.username.clone());
    let builder = Identity::builder(user_id).databases(user.databases.clone());
    match &user.tenant {
        Some(tenant) => builder.tenant(tenant.clone()).build(),
        None => builder.build(),
    }
}

fn read_credentials_file(path: &Path) -> anyhow::Result<Vec<BasicUser>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read credentials file '{}'", path.display()))?;

    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            let (username, password) = line.split_once(':').with_context(|| {
                format!(
                    "invalid credentials at {}:{line_no}: expected 'username:password'",
                    path.display()
                )
            })?;
            Ok(BasicUser::new(username, password))
        })
        .collect()
}
