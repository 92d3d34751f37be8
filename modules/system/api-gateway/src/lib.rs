#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! API Gateway
//!
//! HTTP side of the gatekeeper: an authentication middleware that turns
//! request credentials into an `Identity`, and an authorization middleware
//! that publishes the request scope guarded operations check against.
//!
//! ```ignore
//! let gateway = ApiGateway::from_registry(&cfg.gateway, &registry, &cfg.providers)?;
//! let app = gateway.apply_middleware_stack(routes);
//! ApiGateway::serve(app, "127.0.0.1:8000", cancel).await?;
//! ```

pub mod authn;
pub mod authz;
pub mod bypass;
pub mod config;
pub mod credentials;
pub mod error;
pub mod module;
pub mod problem;

pub use bypass::BypassList;
pub use config::{ApiGatewayConfig, AuthnConfig, AuthzConfig};
pub use credentials::HttpCredentialRequest;
pub use error::ApiError;
pub use module::ApiGateway;
pub use problem::Problem;
