//! Server configuration: YAML file merged with `GATEKEEPER__*` environment
//! variables.

use std::path::Path;

use api_gateway::ApiGatewayConfig;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use gatekeeper_registry::SystemConfig;
use serde::Deserialize;

pub const ENV_PREFIX: &str = "GATEKEEPER__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub gateway: ApiGatewayConfig,
    /// Per-provider sections, keyed by provider name.
    pub providers: SystemConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `api_gateway=debug,info`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl AppConfig {
    /// Load the file at `path` (if it exists) and apply environment overrides.
    ///
    /// # Errors
    /// Returns an error if the file is not valid YAML or the merged
    /// configuration does not match [`AppConfig`].
    pub fn load(path: &Path) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }

    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::load(Path::new("absent.yaml"))?;

            assert_eq!(config.server.bind_addr, "127.0.0.1:8000");
            assert_eq!(config.logging.format, LogFormat::Text);
            assert!(config.gateway.authn.provider.is_none());
            assert!(config.providers.section("simple_rbac").is_none());
            Ok(())
        });
    }

    #[test]
    fn file_sections_are_loaded() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "gatekeeper.yaml",
                r#"
server:
  bind_addr: "0.0.0.0:9000"
logging:
  level: debug
  format: json
gateway:
  authn:
    provider: static_token
  authz:
    provider: simple_rbac
    bypass:
      /api/v1/version: [get]
providers:
  simple_rbac:
    config_provider: inline_authz_config
"#,
            )?;

            let config = AppConfig::load(Path::new("gatekeeper.yaml"))?;

            assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.logging.format, LogFormat::Json);
            assert_eq!(config.gateway.authn.provider.as_deref(), Some("static_token"));
            assert_eq!(config.gateway.authz.provider.as_deref(), Some("simple_rbac"));
            assert_eq!(
                config.gateway.authz.bypass["/api/v1/version"],
                vec!["get".to_owned()]
            );
            assert_eq!(
                config.providers.section("simple_rbac").unwrap()["config_provider"],
                "inline_authz_config"
            );
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "gatekeeper.yaml",
                r#"
server:
  bind_addr: "127.0.0.1:8000"
gateway:
  authn:
    provider: static_token
"#,
            )?;
            jail.set_env("GATEKEEPER__SERVER__BIND_ADDR", "127.0.0.1:9999");
            jail.set_env("GATEKEEPER__GATEWAY__AUTHN__PROVIDER", "basic");

            let config = AppConfig::load(Path::new("gatekeeper.yaml"))?;

            assert_eq!(config.server.bind_addr, "127.0.0.1:9999");
            assert_eq!(config.gateway.authn.provider.as_deref(), Some("basic"));
            Ok(())
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("gatekeeper.yaml", "server:\n  port: 8000\n")?;

            assert!(AppConfig::load(Path::new("gatekeeper.yaml")).is_err());
            Ok(())
        });
    }
}
