//! Wiring: providers from the registry, gateway layers, collections API.

use std::sync::Arc;

use anyhow::Context;
use api_gateway::ApiGateway;
use axum::Router;
use gatekeeper_registry::{CapabilityKind, ProviderRegistry};

use crate::collections::{self, CollectionHooks, CollectionsService, LoggingHook};
use crate::config::AppConfig;

/// Build the fully layered application router.
///
/// # Errors
/// Returns an error if provider registration or construction fails, or if
/// a bypass list is invalid.
pub fn build_router(config: &AppConfig) -> anyhow::Result<Router> {
    let registry =
        ProviderRegistry::from_inventory().context("failed to register providers")?;
    tracing::info!(
        authn = ?registry.names(CapabilityKind::AuthN),
        authz = ?registry.names(CapabilityKind::AuthZ),
        authz_config = ?registry.names(CapabilityKind::AuthZConfig),
        "Provider registry ready"
    );

    let gateway = ApiGateway::from_registry(&config.gateway, &registry, &config.providers)?;
    tracing::info!(
        authn = config.gateway.authn.provider.as_deref().unwrap_or("disabled"),
        authz = config.gateway.authz.provider.as_deref().unwrap_or("disabled"),
        "API gateway configured"
    );

    let mut hooks = CollectionHooks::new();
    hooks.register(Arc::new(LoggingHook));
    let service = Arc::new(CollectionsService::new(hooks));

    Ok(gateway.apply_middleware_stack(collections::router(service)))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn config() -> AppConfig {
        serde_json::from_value(json!({
            "gateway": {
                "authn": { "provider": "static_token" },
                "authz": { "provider": "simple_rbac" }
            },
            "providers": {
                "static_token": {
                    "mode": "static_tokens",
                    "tokens": [
                        { "token": "alice-token", "identity": { "user_id": "alice" } },
                        { "token": "bob-token", "identity": { "user_id": "bob" } }
                    ]
                },
                "simple_rbac": { "config_provider": "inline_authz_config" },
                "inline_authz_config": {
                    "roles_mapping": {
                        "admin": { "actions": [
                            "db:list_collections", "db:create_collection",
                            "collection:get_collection", "collection:delete_collection",
                            "collection:add", "collection:count"
                        ] },
                        "reader": { "actions": ["db:list_collections", "collection:count"] }
                    },
                    "users": [
                        { "id": "alice", "role": "admin" },
                        { "id": "bob", "role": "reader" }
                    ]
                }
            }
        }))
        .unwrap()
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let response: Response = router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_routes_need_no_token() {
        let router = build_router(&config()).unwrap();

        let (status, _) = send(&router, Method::GET, "/api/v1/heartbeat", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, version) = send(&router, Method::GET, "/api/v1/version", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(version, json!(env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn collections_require_a_token() {
        let router = build_router(&config()).unwrap();

        let (status, problem) =
            send(&router, Method::GET, "/api/v1/collections", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(problem["status"], 401);
    }

    #[tokio::test]
    async fn roles_decide_what_each_user_may_do() {
        let router = build_router(&config()).unwrap();

        let (status, _) = send(
            &router,
            Method::POST,
            "/api/v1/collections",
            Some("bob-token"),
            Some(json!({ "name": "docs" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, created) = send(
            &router,
            Method::POST,
            "/api/v1/collections",
            Some("alice-token"),
            Some(json!({ "name": "docs" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["name"], "docs");

        let (status, _) = send(
            &router,
            Method::POST,
            "/api/v1/collections/docs/add",
            Some("alice-token"),
            Some(json!({ "records": [{ "id": 1 }, { "id": 2 }] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, problem) = send(
            &router,
            Method::POST,
            "/api/v1/collections/docs/add",
            Some("bob-token"),
            Some(json!({ "records": [{ "id": 3 }] })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            problem["detail"],
            "Unauthorized: user 'bob' may not 'add' on 'collection'"
        );

        let (status, count) = send(
            &router,
            Method::GET,
            "/api/v1/collections/docs/count",
            Some("bob-token"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(count, json!(2));

        let (status, listed) =
            send(&router, Method::GET, "/api/v1/collections", Some("bob-token"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!(["docs"]));
    }

    #[tokio::test]
    async fn missing_collection_is_not_found() {
        let router = build_router(&config()).unwrap();

        let (status, _) = send(
            &router,
            Method::DELETE,
            "/api/v1/collections/nope",
            Some("alice-token"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn every_linked_provider_is_registered() {
        let registry = ProviderRegistry::from_inventory().unwrap();

        assert_eq!(registry.names(CapabilityKind::AuthN), ["basic", "static_token"]);
        assert_eq!(registry.names(CapabilityKind::AuthZ), ["simple_rbac"]);
        assert_eq!(
            registry.names(CapabilityKind::AuthZConfig),
            ["inline_authz_config", "local_authz_config"]
        );
    }

    #[test]
    fn unknown_provider_fails_startup() {
        let mut config = config();
        config.gateway.authz.provider = Some("opa".to_owned());

        let err = build_router(&config).unwrap_err();
        assert!(err.to_string().contains("unknown authz provider 'opa'"));
    }
}
