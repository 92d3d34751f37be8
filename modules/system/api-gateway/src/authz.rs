//! Authorization middleware: publishes the request scope.

use std::sync::Arc;

use authz_resolver_sdk::{AuthorizationProvider, RequestInfo, RequestScope};
use axum::response::Response;
use gatekeeper_security::Identity;

use crate::bypass::BypassList;

/// Shared state for the authorization middleware.
#[derive(Clone)]
pub struct AuthzState {
    pub provider: Arc<dyn AuthorizationProvider>,
    pub bypass: Arc<BypassList>,
}

impl AuthzState {
    #[must_use]
    pub fn new(provider: Arc<dyn AuthorizationProvider>, bypass: BypassList) -> Self {
        Self {
            provider,
            bypass: Arc::new(bypass),
        }
    }
}

/// Run the rest of the request inside a [`RequestScope`] holding the
/// request, its identity and the decision provider.
///
/// Makes no decision itself; guarded operations further down consult the
/// scope. Bypassed routes run without a scope.
pub async fn authz_middleware(
    axum::extract::State(state): axum::extract::State<AuthzState>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    if state.bypass.matches(req.method(), req.uri().path()) {
        tracing::debug!(
            method = %req.method(),
            path = %req.uri().path(),
            "AuthZ scope bypassed"
        );
        return next.run(req).await;
    }

    let info = RequestInfo::new(
        req.method().clone(),
        req.uri().path(),
        req.extensions().get::<Identity>().cloned(),
    );
    let scope = RequestScope::new(info, Arc::clone(&state.provider));

    scope.run(next.run(req)).await
}
