//! The `(user, resource, action)` triple an authorization decision is made on.

use serde::{Deserialize, Serialize};

use crate::constants::ANONYMOUS_USER_ID;
use crate::identity::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthzUser {
    pub id: String,
}

impl AuthzUser {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_USER_ID)
    }

    /// User for an optional identity, falling back to the anonymous user.
    #[must_use]
    pub fn from_identity(identity: Option<&Identity>) -> Self {
        identity.map_or_else(Self::anonymous, |i| Self::new(i.user_id()))
    }
}

/// What is being acted on: a resource type and, optionally, a concrete instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthzResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl AuthzResource {
    #[must_use]
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthzAction {
    pub id: String,
}

impl AuthzAction {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl From<&str> for AuthzAction {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AuthzAction {
    fn from(id: String) -> Self {
        Self { id }
    }
}

/// Input to an authorization provider. Built per check, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    pub user: AuthzUser,
    pub resource: AuthzResource,
    pub action: AuthzAction,
}

impl AuthorizationContext {
    #[must_use]
    pub fn new(user: AuthzUser, resource: AuthzResource, action: AuthzAction) -> Self {
        Self {
            user,
            resource,
            action,
        }
    }
}
