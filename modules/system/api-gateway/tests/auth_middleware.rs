#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the authentication middleware
//!
//! These tests verify that:
//! 1. Bypassed `(method, route)` pairs reach handlers without credentials
//! 2. Rejected credentials never reach the handler and produce a 401 problem
//! 3. The verified `Identity` is available to handlers
//! 4. Provider errors map to the documented statuses

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use api_gateway::{ApiGateway, ApiGatewayConfig};
use async_trait::async_trait;
use authn_resolver_sdk::{
    AuthNError, AuthenticationProvider, AuthenticationResult, CredentialKind, CredentialRequest,
    CredentialSource,
};
use axum::{
    Extension, Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    routing::get,
};
use gatekeeper_security::Identity;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Maps `<name>-token` to user `<name>`, reading from a configurable source.
struct TokenProvider {
    source: CredentialSource,
}

#[async_trait]
impl AuthenticationProvider for TokenProvider {
    async fn authenticate(
        &self,
        request: &dyn CredentialRequest,
    ) -> Result<AuthenticationResult, AuthNError> {
        let token = self.source.extract(request)?;
        Ok(token
            .as_deref()
            .and_then(|t| t.strip_suffix("-token"))
            .map(Identity::new)
            .into())
    }
}

fn bearer_provider() -> Arc<dyn AuthenticationProvider> {
    Arc::new(TokenProvider {
        source: CredentialSource::bearer(),
    })
}

async fn whoami(Extension(identity): Extension<Identity>) -> String {
    identity.user_id().to_owned()
}

fn app(provider: Arc<dyn AuthenticationProvider>, hits: Arc<AtomicUsize>) -> Router {
    let counted = move || {
        let hits = Arc::clone(&hits);
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            "ok"
        }
    };

    let routes = Router::new()
        .route("/api/v1/heartbeat", get(|| async { "alive" }).post(counted.clone()))
        .route("/api/v1/collections", get(counted))
        .route("/api/v1/whoami", get(whoami));

    ApiGateway::with_providers(&ApiGatewayConfig::default(), Some(provider), None)
        .unwrap()
        .apply_middleware_stack(routes)
}

fn request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn bypassed_route_needs_no_credentials() {
    let hits = Arc::new(AtomicUsize::new(0));
    let response = app(bearer_provider(), hits)
        .oneshot(request(Method::GET, "/api/v1/heartbeat", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "alive");
}

#[tokio::test]
async fn bypass_is_per_method() {
    let hits = Arc::new(AtomicUsize::new(0));
    let response = app(bearer_provider(), Arc::clone(&hits))
        .oneshot(request(Method::POST, "/api/v1/heartbeat", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_credentials_are_rejected_before_the_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let response = app(bearer_provider(), Arc::clone(&hits))
        .oneshot(request(Method::GET, "/api/v1/collections", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    let problem: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(problem["title"], "Unauthorized");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let hits = Arc::new(AtomicUsize::new(0));
    let response = app(bearer_provider(), Arc::clone(&hits))
        .oneshot(request(Method::GET, "/api/v1/collections", Some("garbage")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn verified_identity_reaches_the_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let response = app(bearer_provider(), hits)
        .oneshot(request(Method::GET, "/api/v1/whoami", Some("alice-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "alice");
}

#[tokio::test]
async fn cookie_credentials_are_supported() {
    let provider = Arc::new(TokenProvider {
        source: CredentialSource::new(CredentialKind::Cookie, "session"),
    });
    let hits = Arc::new(AtomicUsize::new(0));

    let req = Request::builder()
        .uri("/api/v1/whoami")
        .header(header::COOKIE, "theme=dark; session=bob-token")
        .body(Body::empty())
        .unwrap();
    let response = app(provider, hits).oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "bob");
}

#[tokio::test]
async fn provider_needing_unsupported_credential_kind_is_a_server_error() {
    let provider = Arc::new(TokenProvider {
        source: CredentialSource::new(CredentialKind::Metadata, "token"),
    });
    let hits = Arc::new(AtomicUsize::new(0));

    let response = app(provider, Arc::clone(&hits))
        .oneshot(request(Method::GET, "/api/v1/collections", Some("alice-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn authentication_disabled_passes_everything_through() {
    let routes = Router::new().route("/api/v1/collections", get(|| async { "open" }));
    let response = ApiGateway::with_providers(&ApiGatewayConfig::default(), None, None)
        .unwrap()
        .apply_middleware_stack(routes)
        .oneshot(request(Method::GET, "/api/v1/collections", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
