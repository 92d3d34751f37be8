#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! HTTP Basic Authentication Provider
//!
//! Reads `Authorization: Basic base64(username:password)` and checks it
//! against users from configuration and/or a `username:password` file.
//!
//! ## Configuration
//!
//! ```yaml
//! providers:
//!   basic:
//!     users:
//!       - username: admin
//!         password: admin
//!         tenant: default_tenant
//!     credentials_file: config/basic.htpasswd
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use module::{PROVIDER_NAME, install};
