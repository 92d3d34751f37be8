use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Route pattern → HTTP methods exempt from a middleware.
pub type BypassConfig = BTreeMap<String, Vec<String>>;

fn default_authn_bypass() -> BypassConfig {
    ["/api/v1", "/api/v1/heartbeat", "/api/v1/version"]
        .into_iter()
        .map(|path| (path.to_owned(), vec!["GET".to_owned()]))
        .collect()
}

/// Gateway auth configuration (`gateway` section).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiGatewayConfig {
    pub authn: AuthnConfig,
    pub authz: AuthzConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthnConfig {
    /// Registered `authn` provider; `None` disables authentication.
    pub provider: Option<String>,
    /// Requests matching these routes skip authentication.
    pub bypass: BypassConfig,
}

impl Default for AuthnConfig {
    fn default() -> Self {
        Self {
            provider: None,
            bypass: default_authn_bypass(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthzConfig {
    /// Registered `authz` provider; `None` publishes no request scope.
    pub provider: Option<String>,
    /// Requests matching these routes run without a request scope.
    pub bypass: BypassConfig,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_bypass_health_routes_for_authn_only() {
        let cfg: ApiGatewayConfig = serde_json::from_value(json!({})).unwrap();

        assert_eq!(cfg.authn.provider, None);
        assert_eq!(cfg.authn.bypass.len(), 3);
        assert_eq!(cfg.authn.bypass["/api/v1/heartbeat"], vec!["GET"]);
        assert!(cfg.authz.bypass.is_empty());
    }

    #[test]
    fn explicit_bypass_replaces_defaults() {
        let cfg: ApiGatewayConfig = serde_json::from_value(json!({
            "authn": { "provider": "static_token", "bypass": { "/health": ["get", "head"] } }
        }))
        .unwrap();

        assert_eq!(cfg.authn.provider.as_deref(), Some("static_token"));
        assert_eq!(cfg.authn.bypass.len(), 1);
        assert_eq!(cfg.authn.bypass["/health"], vec!["get", "head"]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = serde_json::from_value::<ApiGatewayConfig>(json!({
            "authn": { "providr": "static_token" }
        }));
        assert!(err.is_err());
    }
}
