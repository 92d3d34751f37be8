use serde::{Deserialize, Serialize};

/// `Identity` is the outcome of a successful authentication.
///
/// Created by an authentication provider, attached to the request by the
/// authentication middleware and read by authorization checks further down
/// the same request. Never outlives the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Authenticated user id. This is the id authorization policies grant to.
    user_id: String,
    /// Tenant the user acts in, when the provider knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tenant: Option<String>,
    /// Databases the user may address, when the provider knows them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    databases: Vec<String>,
}

impl Identity {
    /// Identity carrying only a user id.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::builder(user_id).build()
    }

    #[must_use]
    pub fn builder(user_id: impl Into<String>) -> IdentityBuilder {
        IdentityBuilder {
            user_id: user_id.into(),
            tenant: None,
            databases: Vec::new(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    #[must_use]
    pub fn databases(&self) -> &[String] {
        &self.databases
    }
}

pub struct IdentityBuilder {
    user_id: String,
    tenant: Option<String>,
    databases: Vec<String>,
}

impl IdentityBuilder {
    #[must_use]
    pub fn tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    #[must_use]
    pub fn databases(mut self, databases: Vec<String>) -> Self {
        self.databases = databases;
        self
    }

    #[must_use]
    pub fn build(self) -> Identity {
        Identity {
            user_id: self.user_id,
            tenant: self.tenant,
            databases: self.databases,
        }
    }
}
