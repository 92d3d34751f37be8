//! Error types for authentication.

use thiserror::Error;

use crate::credentials::CredentialKind;

/// Errors raised while reading credentials from a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The transport cannot supply this kind of credential.
    #[error("credential kind '{0}' is not supported by this transport")]
    UnsupportedKind(CredentialKind),

    /// The credential is present but cannot be read (e.g. non-UTF-8 header).
    #[error("unreadable {kind} credential '{key}'")]
    Unreadable { kind: CredentialKind, key: String },
}

/// Errors that can occur while authenticating a request.
///
/// A credential that simply does not verify is not an error: providers
/// report it as an unsuccessful [`AuthenticationResult`](crate::AuthenticationResult).
#[derive(Debug, Error)]
pub enum AuthNError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The identity backend could not be reached.
    #[error("authentication backend unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
