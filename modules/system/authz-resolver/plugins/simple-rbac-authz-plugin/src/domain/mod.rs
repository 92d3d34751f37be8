pub mod client;
pub mod policy;
pub mod service;
pub mod source;

pub use policy::{AuthzTuple, PolicyError, RbacPolicy};
pub use service::SimpleRbacAuthorizer;
pub use source::{InlineConfigProvider, LocalFileConfigProvider};
