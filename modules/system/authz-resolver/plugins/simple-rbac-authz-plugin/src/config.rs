//! Configuration for the RBAC authorization providers.

use std::path::PathBuf;

use serde::Deserialize;

/// Default name of the configuration provider the RBAC engine loads from.
pub const DEFAULT_CONFIG_PROVIDER: &str = "local_authz_config";

/// `providers.simple_rbac` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimpleRbacConfig {
    /// Registry name of the `authz_config` provider holding users and roles.
    pub config_provider: String,
}

impl Default for SimpleRbacConfig {
    fn default() -> Self {
        Self {
            config_provider: DEFAULT_CONFIG_PROVIDER.to_owned(),
        }
    }
}

/// `providers.local_authz_config` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalFileConfig {
    /// YAML file, or JSON when the extension is `.json`.
    pub config_file: PathBuf,
}
