#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthZ` Resolver SDK
//!
//! This crate provides the public API for authorization:
//!
//! - [`AuthorizationProvider`] - Decision provider trait for implementations
//! - [`AuthorizationConfigProvider`] - Source of users and role grants
//! - [`AuthZCapability`], [`AuthZConfigCapability`] - Registry markers
//! - [`RequestScope`] - Task-local request context published by the gateway
//! - [`AuthorizationError`] - Error types
//! - [`pep`] - PEP helpers ([`AuthzGuard`], [`ResourceSpec`])
//! - [`resources`] - Resource types and [`DataAction`] catalogue
//!
//! ## Usage
//!
//! ```ignore
//! use authz_resolver_sdk::{AuthzGuard, resources::{self, DataAction}};
//!
//! // Once, during init
//! let list = AuthzGuard::<()>::new("list_collections", DataAction::ListCollections, resources::database("default"));
//!
//! // Per call; runs `f` only if the current request's user holds `db:list_collections`
//! let names = list.call((), |()| async { Ok::<_, ApiError>(store.names()) }).await?;
//! ```

pub mod capability;
pub mod error;
pub mod models;
pub mod pep;
pub mod plugin_api;
pub mod resources;
pub mod scope;

// Re-export main types at crate root
pub use capability::{AuthZCapability, AuthZConfigCapability};
pub use error::{AuthZProviderError, AuthorizationError, AuthzConfigError, RoleActionParseError};
pub use models::{AuthzConfiguration, RoleAction, RoleConfig, UserConfig};
pub use pep::{Authorized, AuthzGuard, MissingScopePolicy, ResourceSpec};
pub use plugin_api::{AuthorizationConfigProvider, AuthorizationProvider};
pub use resources::DataAction;
pub use scope::{RequestInfo, RequestScope};
