//! API Gateway definition
//!
//! Wires the authentication and authorization middleware around an application
//! router and serves it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use authn_resolver_sdk::{AuthNCapability, AuthenticationProvider};
use authz_resolver_sdk::{AuthZCapability, AuthorizationProvider};
use axum::Router;
use axum::middleware::from_fn_with_state;
use gatekeeper_registry::{ProviderRegistry, SystemConfig};
use tokio_util::sync::CancellationToken;
use tracing::field::Empty;

use crate::authn::{self, AuthnState};
use crate::authz::{self, AuthzState};
use crate::bypass::BypassList;
use crate::config::ApiGatewayConfig;

/// Gateway auth stack: optional authentication, optional request scope.
#[derive(Clone)]
pub struct ApiGateway {
    authn: Option<AuthnState>,
    authz: Option<AuthzState>,
}

impl ApiGateway {
    /// Resolve the configured providers through the registry.
    ///
    /// # Errors
    /// Returns an error if a configured provider is unknown or fails to
    /// construct, or if a bypass list is invalid.
    pub fn from_registry(
        config: &ApiGatewayConfig,
        registry: &ProviderRegistry,
        system: &SystemConfig,
    ) -> Result<Self> {
        let authn = config
            .authn
            .provider
            .as_deref()
            .map(|name| registry.instantiate::<AuthNCapability>(name, system))
            .transpose()?;
        let authz = config
            .authz
            .provider
            .as_deref()
            .map(|name| registry.instantiate::<AuthZCapability>(name, system))
            .transpose()?;

        Self::with_providers(config, authn, authz)
    }

    /// Build from already constructed providers.
    ///
    /// # Errors
    /// Returns an error if a bypass list is invalid.
    pub fn with_providers(
        config: &ApiGatewayConfig,
        authn: Option<Arc<dyn AuthenticationProvider>>,
        authz: Option<Arc<dyn AuthorizationProvider>>,
    ) -> Result<Self> {
        let authn = authn
            .map(|provider| {
                BypassList::from_config(&config.authn.bypass)
                    .map(|bypass| AuthnState::new(provider, bypass))
            })
            .transpose()?;
        let authz = authz
            .map(|provider| {
                BypassList::from_config(&config.authz.bypass)
                    .map(|bypass| AuthzState::new(provider, bypass))
            })
            .transpose()?;

        if authn.is_none() {
            tracing::warn!(
                "API Gateway authentication is DISABLED: every request reaches handlers without an identity \
                 and is authorized as the anonymous user."
            );
        }
        if authz.is_none() {
            tracing::warn!(
                "API Gateway authorization scope is DISABLED: guarded operations run unchecked."
            );
        }

        Ok(Self { authn, authz })
    }

    #[must_use]
    pub fn authn_enabled(&self) -> bool {
        self.authn.is_some()
    }

    #[must_use]
    pub fn authz_enabled(&self) -> bool {
        self.authz.is_some()
    }

    /// Apply the middleware layers to a router.
    #[must_use]
    pub fn apply_middleware_stack(&self, mut router: Router) -> Router {
        // `Router::layer` wraps everything added before it, so the last layer
        // added is the first to see a request.
        //
        // Request order (outermost -> innermost): Trace -> AuthN -> AuthZ -> Router

        // 3) AuthZ: publish the request scope around the handler
        if let Some(state) = self.authz.clone() {
            router = router.layer(from_fn_with_state(state, authz::authz_middleware));
        }

        // 2) AuthN: must run first so the scope sees the identity
        if let Some(state) = self.authn.clone() {
            router = router.layer(from_fn_with_state(state, authn::authn_middleware));
        }

        // 1) Trace
        router.layer({
            use tower_http::trace::TraceLayer;

            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        version = ?req.version(),
                        module = "api_gateway",
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<axum::body::Body>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", latency.as_millis());
                    },
                )
        })
    }

    /// HTTP server: bind, serve until cancelled.
    ///
    /// # Errors
    /// Returns an error if the address is invalid, binding fails, or the
    /// server stops with an I/O error.
    pub async fn serve(router: Router, bind_addr: &str, cancel: CancellationToken) -> Result<()> {
        let addr = parse_bind_address(bind_addr)?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", addr);

        // Graceful shutdown on cancel
        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("authn_enabled", &self.authn_enabled())
            .field("authz_enabled", &self.authz_enabled())
            .finish()
    }
}

/// Parse bind address from configuration string.
fn parse_bind_address(bind_addr: &str) -> Result<SocketAddr> {
    bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{bind_addr}': {e}"))
}
