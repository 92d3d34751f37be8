//! Configuration for the HTTP Basic authentication provider.

use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BasicAuthConfig {
    /// Users accepted by the provider.
    pub users: Vec<BasicUser>,

    /// Optional file of `username:password` lines, one user per line.
    /// Blank lines and lines starting with `#` are skipped.
    pub credentials_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BasicUser {
    pub username: String,
    pub password: SecretString,
    /// Identity user id. Defaults to the username.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default)]
    pub databases: Vec<String>,
}

impl BasicUser {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            user_id: None,
            tenant: None,
            databases: Vec::new(),
        }
    }
}
