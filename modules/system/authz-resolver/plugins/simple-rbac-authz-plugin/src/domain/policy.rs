//! Compiled role-based policy.

use std::collections::{HashMap, HashSet};

use authz_resolver_sdk::{AuthzConfigError, AuthzConfiguration, RoleAction, RoleActionParseError};
use gatekeeper_security::AuthorizationContext;
use thiserror::Error;

/// One grant: `user_id` may perform `action` on resources of `resource_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthzTuple {
    pub user_id: String,
    pub resource_type: String,
    pub action: String,
}

impl AuthzTuple {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        resource_type: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            resource_type: resource_type.into(),
            action: action.into(),
        }
    }

    #[must_use]
    pub fn from_context(ctx: &AuthorizationContext) -> Self {
        Self::new(
            ctx.user.id.as_str(),
            ctx.resource.resource_type.as_str(),
            ctx.action.id.as_str(),
        )
    }
}

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("role '{role}' grants malformed action: {source}")]
    MalformedAction {
        role: String,
        #[source]
        source: RoleActionParseError,
    },

    #[error("user '{user}' references unknown role '{role}'")]
    UnknownRole { user: String, role: String },

    #[error(transparent)]
    Config(#[from] AuthzConfigError),
}

/// Immutable set of grants. Built once; a new configuration means a new policy.
#[derive(Debug, Default)]
pub struct RbacPolicy {
    tuples: HashSet<AuthzTuple>,
}

impl RbacPolicy {
    /// Expand every user's role into tuples.
    ///
    /// # Errors
    /// - [`PolicyError::MalformedAction`] if any role action is not
    ///   `resource_type:action`, whether or not a user holds the role
    /// - [`PolicyError::UnknownRole`] if a user's role is not defined
    pub fn compile(config: &AuthzConfiguration) -> Result<Self, PolicyError> {
        let mut roles: HashMap<&str, Vec<RoleAction>> =
            HashMap::with_capacity(config.roles_mapping.len());
        for (role, role_config) in &config.roles_mapping {
            let actions = role_config
                .actions
                .iter()
                .map(|a| a.parse::<RoleAction>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| PolicyError::MalformedAction {
                    role: role.clone(),
                    source,
                })?;
            roles.insert(role.as_str(), actions);
        }

        let mut tuples = HashSet::new();
        for user in &config.users {
            let Some(role) = user.role.as_deref() else {
                continue;
            };
            let actions = roles.get(role).ok_or_else(|| PolicyError::UnknownRole {
                user: user.id.clone(),
                role: role.to_owned(),
            })?;
            tuples.extend(actions.iter().map(|a| {
                AuthzTuple::new(user.id.as_str(), a.resource_type.as_str(), a.action.as_str())
            }));
        }

        Ok(Self { tuples })
    }

    /// Exact membership test; there are no wildcards.
    #[must_use]
    pub fn allows(&self, ctx: &AuthorizationContext) -> bool {
        self.tuples.contains(&AuthzTuple::from_context(ctx))
    }

    #[must_use]
    pub fn contains(&self, tuple: &AuthzTuple) -> bool {
        self.tuples.contains(tuple)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use authz_resolver_sdk::{RoleConfig, UserConfig};
    use gatekeeper_security::{AuthzAction, AuthzResource, AuthzUser};

    fn role(actions: &[&str]) -> RoleConfig {
        RoleConfig {
            actions: actions.iter().map(|a| (*a).to_owned()).collect(),
        }
    }

    fn user(id: &str, role: Option<&str>) -> UserConfig {
        UserConfig {
            id: id.to_owned(),
            role: role.map(str::to_owned),
            tokens: Vec::new(),
        }
    }

    fn ctx(user: &str, resource_type: &str, action: &str) -> AuthorizationContext {
        AuthorizationContext::new(
            AuthzUser::new(user),
            AuthzResource::new(resource_type).with_id("anything"),
            AuthzAction::new(action),
        )
    }

    fn sample() -> AuthzConfiguration {
        AuthzConfiguration {
            roles_mapping: [
                (
                    "admin".to_owned(),
                    role(&["db:list_collections", "db:create_collection", "collection:add"]),
                ),
                ("reader".to_owned(), role(&["collection:get", "collection:count"])),
            ]
            .into_iter()
            .collect(),
            users: vec![
                user("alice", Some("admin")),
                user("bob", Some("reader")),
                user("carol", None),
            ],
        }
    }

    #[test]
    fn grants_exactly_the_role_actions() {
        let policy = RbacPolicy::compile(&sample()).unwrap();

        assert_eq!(policy.len(), 5);
        assert!(policy.allows(&ctx("alice", "db", "list_collections")));
        assert!(policy.allows(&ctx("alice", "collection", "add")));
        assert!(policy.allows(&ctx("bob", "collection", "count")));

        assert!(!policy.allows(&ctx("bob", "collection", "add")));
        assert!(!policy.allows(&ctx("alice", "collection", "get")));
        // Same action name on another resource type is a different grant.
        assert!(!policy.allows(&ctx("bob", "db", "get")));
    }

    #[test]
    fn unknown_user_is_denied_every_action() {
        let config = AuthzConfiguration {
            roles_mapping: [(
                "admin".to_owned(),
                role(&["collection:add", "collection:get"]),
            )]
            .into_iter()
            .collect(),
            users: vec![user("u1", Some("admin"))],
        };
        let policy = RbacPolicy::compile(&config).unwrap();

        assert!(policy.allows(&ctx("u1", "collection", "add")));
        assert!(!policy.allows(&ctx("u1", "collection", "delete")));
        for action in ["add", "get", "delete"] {
            assert!(!policy.allows(&ctx("u2", "collection", action)));
        }
    }

    #[test]
    fn user_without_role_is_always_denied() {
        let policy = RbacPolicy::compile(&sample()).unwrap();
        assert!(!policy.allows(&ctx("carol", "collection", "get")));
        assert!(!policy.allows(&ctx("Anonymous", "collection", "get")));
    }

    #[test]
    fn resource_id_does_not_affect_decision() {
        let policy = RbacPolicy::compile(&sample()).unwrap();
        let mut c = ctx("bob", "collection", "get");
        c.resource.id = None;
        assert!(policy.allows(&c));
    }

    #[test]
    fn malformed_action_fails_compilation() {
        let mut config = sample();
        config
            .roles_mapping
            .insert("broken".to_owned(), role(&["collection"]));

        let err = RbacPolicy::compile(&config).unwrap_err();
        assert!(
            matches!(err, PolicyError::MalformedAction { ref role, .. } if role == "broken"),
            "{err}"
        );
    }

    #[test]
    fn unknown_role_fails_compilation() {
        let mut config = sample();
        config.users.push(user("dave", Some("superuser")));

        let err = RbacPolicy::compile(&config).unwrap_err();
        assert_eq!(err.to_string(), "user 'dave' references unknown role 'superuser'");
    }

    #[test]
    fn empty_configuration_denies_everything() {
        let policy = RbacPolicy::compile(&AuthzConfiguration::default()).unwrap();
        assert!(policy.is_empty());
        assert!(!policy.contains(&AuthzTuple::new("alice", "db", "reset")));
    }
}
