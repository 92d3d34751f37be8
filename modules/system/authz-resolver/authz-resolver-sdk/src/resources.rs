//! Resource types and actions of the protected data service.

use std::fmt;
use std::str::FromStr;

use gatekeeper_security::{AuthzAction, AuthzResource};

use crate::models::RoleAction;

pub const TENANT: &str = "tenant";
pub const DATABASE: &str = "db";
pub const COLLECTION: &str = "collection";

#[must_use]
pub fn tenant(name: impl Into<String>) -> AuthzResource {
    AuthzResource::new(TENANT).with_id(name)
}

#[must_use]
pub fn database(name: impl Into<String>) -> AuthzResource {
    AuthzResource::new(DATABASE).with_id(name)
}

#[must_use]
pub fn collection(name: impl Into<String>) -> AuthzResource {
    AuthzResource::new(COLLECTION).with_id(name)
}

/// Every action the data service checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataAction {
    CreateTenant,
    GetTenant,
    CreateDatabase,
    GetDatabase,
    Reset,
    ListCollections,
    CreateCollection,
    GetOrCreateCollection,
    GetCollection,
    DeleteCollection,
    UpdateCollection,
    Add,
    Delete,
    Get,
    Query,
    Peek,
    Update,
    Upsert,
    Count,
}

impl DataAction {
    pub const ALL: [Self; 19] = [
        Self::CreateTenant,
        Self::GetTenant,
        Self::CreateDatabase,
        Self::GetDatabase,
        Self::Reset,
        Self::ListCollections,
        Self::CreateCollection,
        Self::GetOrCreateCollection,
        Self::GetCollection,
        Self::DeleteCollection,
        Self::UpdateCollection,
        Self::Add,
        Self::Delete,
        Self::Get,
        Self::Query,
        Self::Peek,
        Self::Update,
        Self::Upsert,
        Self::Count,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateTenant => "create_tenant",
            Self::GetTenant => "get_tenant",
            Self::CreateDatabase => "create_database",
            Self::GetDatabase => "get_database",
            Self::Reset => "reset",
            Self::ListCollections => "list_collections",
            Self::CreateCollection => "create_collection",
            Self::GetOrCreateCollection => "get_or_create_collection",
            Self::GetCollection => "get_collection",
            Self::DeleteCollection => "delete_collection",
            Self::UpdateCollection => "update_collection",
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Get => "get",
            Self::Query => "query",
            Self::Peek => "peek",
            Self::Update => "update",
            Self::Upsert => "upsert",
            Self::Count => "count",
        }
    }

    /// Resource type the action is granted on in role configurations.
    ///
    /// Collection creation is a database-level grant; everything else that
    /// names a collection is a collection-level grant.
    #[must_use]
    pub const fn resource_type(self) -> &'static str {
        match self {
            Self::CreateTenant | Self::GetTenant => TENANT,
            Self::CreateDatabase
            | Self::GetDatabase
            | Self::Reset
            | Self::ListCollections
            | Self::CreateCollection
            | Self::GetOrCreateCollection => DATABASE,
            Self::GetCollection
            | Self::DeleteCollection
            | Self::UpdateCollection
            | Self::Add
            | Self::Delete
            | Self::Get
            | Self::Query
            | Self::Peek
            | Self::Update
            | Self::Upsert
            | Self::Count => COLLECTION,
        }
    }

    #[must_use]
    pub fn role_action(self) -> RoleAction {
        RoleAction::new(self.resource_type(), self.as_str())
    }
}

impl fmt::Display for DataAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown data action '{s}'"))
    }
}

impl From<DataAction> for AuthzAction {
    fn from(action: DataAction) -> Self {
        Self::new(action.as_str())
    }
}
