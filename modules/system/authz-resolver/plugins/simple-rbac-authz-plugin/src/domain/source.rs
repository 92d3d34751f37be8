//! Configuration sources for the RBAC engine.

use std::path::{Path, PathBuf};

use authz_resolver_sdk::{AuthorizationConfigProvider, AuthzConfigError, AuthzConfiguration};

/// Reads users and roles from a file on every call.
///
/// Files ending in `.json` are parsed as JSON, everything else as YAML.
#[derive(Debug, Clone)]
pub struct LocalFileConfigProvider {
    path: PathBuf,
}

impl LocalFileConfigProvider {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

impl AuthorizationConfigProvider for LocalFileConfigProvider {
    fn configuration(&self) -> Result<AuthzConfiguration, AuthzConfigError> {
        let origin = self.path.display().to_string();
        let text = std::fs::read_to_string(&self.path).map_err(|source| AuthzConfigError::Read {
            origin: origin.clone(),
            source,
        })?;

        let parsed = if self.is_json() {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_saphyr::from_str(&text).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| AuthzConfigError::Invalid { origin, message })
    }
}

/// Serves a configuration embedded in the system configuration.
#[derive(Debug, Clone)]
pub struct InlineConfigProvider {
    config: AuthzConfiguration,
}

impl InlineConfigProvider {
    #[must_use]
    pub fn new(config: AuthzConfiguration) -> Self {
        Self { config }
    }
}

impl AuthorizationConfigProvider for InlineConfigProvider {
    fn configuration(&self) -> Result<AuthzConfiguration, AuthzConfigError> {
        Ok(self.config.clone())
    }
}
