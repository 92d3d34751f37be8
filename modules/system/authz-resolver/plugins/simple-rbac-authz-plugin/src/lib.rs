#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Simple RBAC Authorization Provider
//!
//! Grants are `(user, resource_type, action)` tuples expanded from each
//! user's role. A check is an exact set lookup: no wildcards, no hierarchy.
//!
//! Users and roles come from an `authz_config` provider resolved by name:
//!
//! - **`local_authz_config`** (default): YAML or JSON file.
//! - **`inline_authz_config`**: the document is the provider's own
//!   configuration section.
//!
//! ## Configuration
//!
//! ```yaml
//! providers:
//!   simple_rbac:
//!     config_provider: local_authz_config
//!   local_authz_config:
//!     config_file: config/authz.yaml
//! ```
//!
//! with `config/authz.yaml`:
//!
//! ```yaml
//! roles_mapping:
//!   reader:
//!     actions: ["db:list_collections", "collection:get", "collection:count"]
//! users:
//!   - id: alice
//!     role: reader
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use domain::{AuthzTuple, PolicyError, RbacPolicy, SimpleRbacAuthorizer};
pub use module::{PROVIDER_NAME, install};
