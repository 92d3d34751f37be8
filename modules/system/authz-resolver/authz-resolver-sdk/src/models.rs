//! Authorization configuration models.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RoleActionParseError;

/// Users and role grants loaded by an authorization configuration provider.
///
/// ```yaml
/// roles_mapping:
///   admin:
///     actions: ["db:list_collections", "collection:add"]
/// users:
///   - id: alice
///     role: admin
///     tokens:
///       - token: alice-token
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthzConfiguration {
    #[serde(default)]
    pub users: Vec<UserConfig>,
    #[serde(default)]
    pub roles_mapping: BTreeMap<String, RoleConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    pub id: String,
    /// Users without a role are granted nothing.
    #[serde(default)]
    pub role: Option<String>,
    /// Credentials of the user, opaque to authorization.
    #[serde(default, alias = "credentials")]
    pub tokens: Vec<serde_json::Value>,
}

/// A role and the actions it grants. Keys other than `actions` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleConfig {
    #[serde(default)]
    pub actions: Vec<String>,
}

/// One grant of a role: an action on a resource type, written
/// `"resource_type:action"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleAction {
    pub resource_type: String,
    pub action: String,
}

impl RoleAction {
    #[must_use]
    pub fn new(resource_type: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            action: action.into(),
        }
    }
}

impl FromStr for RoleAction {
    type Err = RoleActionParseError;

    /// Exactly one `:` with non-empty text on both sides.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((resource_type, action))
                if !resource_type.is_empty() && !action.is_empty() && !action.contains(':') =>
            {
                Ok(Self::new(resource_type, action))
            }
            _ => Err(RoleActionParseError(s.to_owned())),
        }
    }
}

impl fmt::Display for RoleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.action)
    }
}
