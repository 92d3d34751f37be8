#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Token Authentication Provider
//!
//! This provider maps tokens to identities from configuration, for
//! development and testing.
//!
//! ## Modes
//!
//! - **`accept_all`** (default): Accepts any non-empty token, returns the configured
//!   default identity.
//!
//! - **`static_tokens`**: Maps specific tokens to specific identities. Useful for E2E tests
//!   with distinct users.
//!
//! The token location is configurable (`source`); by default it is the
//! `Authorization: Bearer <token>` header.
//!
//! ## Configuration
//!
//! ```yaml
//! providers:
//!   static_token:
//!     mode: static_tokens
//!     source:
//!       kind: header
//!       key: x-chroma-token
//!     default_identity:
//!       user_id: "default_user"
//!     tokens:
//!       - token: "admin-token"
//!         identity:
//!           user_id: "admin"
//!           tenant: "default_tenant"
//!           databases: ["default_database"]
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use module::{PROVIDER_NAME, install};
