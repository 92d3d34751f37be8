//! Error type for handlers behind the gateway.

use authz_resolver_sdk::AuthorizationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::problem::Problem;

/// Handler error rendered as Problem Details.
///
/// Authorization failures convert with `?` from [`AuthorizationError`], so
/// an [`AuthzGuard`](authz_resolver_sdk::AuthzGuard) can be used directly in
/// a handler returning `Result<_, ApiError>`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub fn to_problem(&self) -> Problem {
        match self {
            Self::Authorization(
                e @ (AuthorizationError::Denied { .. } | AuthorizationError::MissingScope { .. }),
            ) => Problem::forbidden(e.to_string()),
            Self::Authorization(AuthorizationError::Evaluation(_)) => {
                Problem::internal("Authorization could not be evaluated")
            }
            Self::NotFound(detail) => Problem::new(StatusCode::NOT_FOUND, "Not Found", detail),
            Self::BadRequest(detail) => Problem::new(StatusCode::BAD_REQUEST, "Bad Request", detail),
            Self::Conflict(detail) => Problem::new(StatusCode::CONFLICT, "Conflict", detail),
            Self::Internal(_) => Problem::internal("Internal error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Authorization(AuthorizationError::Evaluation(e)) => {
                tracing::error!(error = %e, "Authorization evaluation failed");
            }
            Self::Internal(msg) => tracing::error!(error = %msg, "Internal error"),
            _ => {}
        }
        self.to_problem().into_response()
    }
}
