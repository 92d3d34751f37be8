//! Authentication middleware.

use std::sync::Arc;

use authn_resolver_sdk::{AuthNError, AuthenticationProvider, CredentialError};
use axum::http::Method;
use axum::response::{IntoResponse, Response};

use crate::bypass::BypassList;
use crate::credentials::HttpCredentialRequest;
use crate::problem::Problem;

/// Shared state for the authentication middleware.
#[derive(Clone)]
pub struct AuthnState {
    pub provider: Arc<dyn AuthenticationProvider>,
    pub bypass: Arc<BypassList>,
}

impl AuthnState {
    #[must_use]
    pub fn new(provider: Arc<dyn AuthenticationProvider>, bypass: BypassList) -> Self {
        Self {
            provider,
            bypass: Arc::new(bypass),
        }
    }
}

/// Authentication middleware backed by an [`AuthenticationProvider`].
///
/// For each request:
/// 1. Skips CORS preflight requests and bypassed routes
/// 2. Hands the request's credentials to the provider
/// 3. On success, inserts the `Identity` into request extensions
/// 4. Otherwise answers 401 (500 if the provider reads a credential kind HTTP
///    cannot supply) without calling the handler
pub async fn authn_middleware(
    axum::extract::State(state): axum::extract::State<AuthnState>,
    mut req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    if state.bypass.matches(req.method(), req.uri().path()) {
        tracing::debug!(
            method = %req.method(),
            path = %req.uri().path(),
            "AuthN bypassed"
        );
        return next.run(req).await;
    }

    let outcome = {
        let credentials = HttpCredentialRequest::new(req.headers(), req.uri());
        state.provider.authenticate(&credentials).await
    };

    match outcome {
        Ok(result) => match result.into_identity() {
            Some(identity) => {
                tracing::debug!(user_id = %identity.user_id(), "AuthN succeeded");
                req.extensions_mut().insert(identity);
                next.run(req).await
            }
            None => {
                tracing::debug!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    "AuthN rejected"
                );
                Problem::unauthorized("Missing or invalid credentials").into_response()
            }
        },
        Err(err) => authn_error_to_response(&err),
    }
}

/// Convert `AuthNError` to an RFC-9457 Problem Details response.
fn authn_error_to_response(err: &AuthNError) -> Response {
    log_authn_error(err);
    match err {
        AuthNError::Credential(CredentialError::UnsupportedKind(_)) => {
            Problem::internal("Authentication provider is misconfigured for this transport")
        }
        AuthNError::Credential(CredentialError::Unreadable { .. }) => {
            Problem::unauthorized("Unreadable credentials")
        }
        AuthNError::Unavailable(_) | AuthNError::Internal(_) => {
            Problem::unauthorized("Authentication failed")
        }
    }
    .into_response()
}

/// Log authentication errors at appropriate levels.
///
/// Cognitive complexity is inflated by tracing macro expansion.
#[allow(clippy::cognitive_complexity)]
fn log_authn_error(err: &AuthNError) {
    match err {
        AuthNError::Credential(CredentialError::Unreadable { kind, key }) => {
            tracing::debug!("AuthN rejected: unreadable {kind} credential '{key}'");
        }
        AuthNError::Credential(e @ CredentialError::UnsupportedKind(_)) => {
            tracing::error!("AuthN provider misconfigured: {e}");
        }
        AuthNError::Unavailable(msg) => tracing::error!("AuthN backend unavailable: {msg}"),
        AuthNError::Internal(msg) => tracing::error!("AuthN internal error: {msg}"),
    }
}

/// Check if this is a CORS preflight request
///
/// Preflight requests are OPTIONS requests with:
/// - Origin header present
/// - Access-Control-Request-Method header present
fn is_preflight_request(method: &Method, headers: &axum::http::HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(axum::http::header::ORIGIN)
        && headers.contains_key(axum::http::header::ACCESS_CONTROL_REQUEST_METHOD)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
    use tracing_test::traced_test;

    #[test]
    fn preflight_requires_origin_and_request_method() {
        let mut headers = HeaderMap::new();
        assert!(!is_preflight_request(&Method::OPTIONS, &headers));

        headers.insert(header::ORIGIN, HeaderValue::from_static("https://app"));
        headers.insert(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        );
        assert!(is_preflight_request(&Method::OPTIONS, &headers));
        assert!(!is_preflight_request(&Method::POST, &headers));
    }

    #[test]
    fn provider_errors_map_to_statuses() {
        let unsupported = AuthNError::Credential(CredentialError::UnsupportedKind(
            authn_resolver_sdk::CredentialKind::Metadata,
        ));
        assert_eq!(
            authn_error_to_response(&unsupported).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            authn_error_to_response(&AuthNError::Unavailable("ldap down".to_owned())).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    #[traced_test]
    fn misconfigured_provider_is_logged_as_error() {
        let unsupported = AuthNError::Credential(CredentialError::UnsupportedKind(
            authn_resolver_sdk::CredentialKind::Metadata,
        ));
        let _ = authn_error_to_response(&unsupported);

        assert!(logs_contain("AuthN provider misconfigured"));
    }
}
