#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod authz_context;
pub mod constants;
pub mod identity;

pub use authz_context::{AuthorizationContext, AuthzAction, AuthzResource, AuthzUser};
pub use identity::Identity;
