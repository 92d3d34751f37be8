//! PEP (Policy Enforcement Point) helpers.
//!
//! - [`AuthzGuard`]: authorization check bound to one business operation
//! - [`ResourceSpec`]: fixed resource or per-call resolver
//! - [`Authorized`]: an operation wrapped by its guard

pub mod enforcer;

pub use enforcer::{Authorized, AuthzGuard, MissingScopePolicy, ResourceResolver, ResourceSpec};
