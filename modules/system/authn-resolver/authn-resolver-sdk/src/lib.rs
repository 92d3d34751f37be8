//! `AuthN` Resolver SDK
//!
//! This crate provides the public contract for authentication providers:
//!
//! - [`CredentialRequest`] - How a transport surfaces raw credentials
//! - [`AuthenticationProvider`] - Provider trait implemented by plugins
//! - [`AuthenticationResult`] - Authentication outcome model
//! - [`AuthNError`] / [`CredentialError`] - Error types
//! - [`AuthNCapability`] - Registry marker for authentication providers
//!
//! ## Usage
//!
//! The gateway resolves the configured provider from the registry once at
//! startup:
//!
//! ```ignore
//! use authn_resolver_sdk::AuthNCapability;
//!
//! let authn = registry.instantiate::<AuthNCapability>("static_token", &system)?;
//! let result = authn.authenticate(&credentials).await?;
//! if let Some(identity) = result.identity() { /* ... */ }
//! ```

pub mod capability;
pub mod credentials;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use capability::AuthNCapability;
pub use credentials::{
    CredentialKind, CredentialRequest, CredentialSource, InMemoryCredentialRequest,
};
pub use error::{AuthNError, CredentialError};
pub use models::AuthenticationResult;
pub use plugin_api::AuthenticationProvider;
