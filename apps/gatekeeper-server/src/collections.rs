//! In-memory collections API behind the gateway.
//!
//! Every operation is wrapped by an [`AuthzGuard`] and dispatched through a
//! [`HookDispatcher`]: the guard checks the request scope first, then the
//! hooks see the arguments and the result of the operation.

use std::collections::BTreeMap;
use std::sync::Arc;

use api_gateway::ApiError;
use authz_resolver_sdk::{AuthorizationError, AuthzGuard, DataAction, resources};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use gatekeeper_hooks::{HookDispatcher, HookError, OperationHook};
use gatekeeper_security::AuthzResource;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Database every collection of the demo store lives in.
pub const DEFAULT_DATABASE: &str = "default_database";

/// Arguments of a collections operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionArgs {
    pub collection: Option<String>,
    pub records: Vec<Value>,
}

impl CollectionArgs {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn named(collection: impl Into<String>) -> Self {
        Self {
            collection: Some(collection.into()),
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_records(mut self, records: Vec<Value>) -> Self {
        self.records = records;
        self
    }

    fn name(&self) -> Result<&str, ServiceError> {
        self.collection
            .as_deref()
            .ok_or_else(|| ServiceError::BadRequest("collection name is required".to_owned()))
    }
}

pub type CollectionHooks = HookDispatcher<CollectionArgs, Value>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("collection '{0}' not found")]
    NotFound(String),

    #[error("collection '{0}' already exists")]
    AlreadyExists(String),

    #[error("{0}")]
    BadRequest(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Authorization(e) => Self::Authorization(e),
            ServiceError::Hook(e) => Self::Internal(e.to_string()),
            e @ ServiceError::NotFound(_) => Self::NotFound(e.to_string()),
            e @ ServiceError::AlreadyExists(_) => Self::Conflict(e.to_string()),
            ServiceError::BadRequest(msg) => Self::BadRequest(msg),
        }
    }
}

struct Guards {
    list: AuthzGuard<CollectionArgs>,
    create: AuthzGuard<CollectionArgs>,
    get: AuthzGuard<CollectionArgs>,
    delete: AuthzGuard<CollectionArgs>,
    add: AuthzGuard<CollectionArgs>,
    count: AuthzGuard<CollectionArgs>,
}

impl Guards {
    fn new() -> Self {
        Self {
            list: database_guard(DataAction::ListCollections),
            create: database_guard(DataAction::CreateCollection),
            get: collection_guard(DataAction::GetCollection),
            delete: collection_guard(DataAction::DeleteCollection),
            add: collection_guard(DataAction::Add),
            count: collection_guard(DataAction::Count),
        }
    }
}

fn database_guard(action: DataAction) -> AuthzGuard<CollectionArgs> {
    AuthzGuard::new(action.as_str(), action, resources::database(DEFAULT_DATABASE))
}

fn collection_guard(action: DataAction) -> AuthzGuard<CollectionArgs> {
    AuthzGuard::dynamic(action.as_str(), action, |_, args: &CollectionArgs| {
        args.collection.as_deref().map_or_else(
            || AuthzResource::new(resources::COLLECTION),
            resources::collection,
        )
    })
}

/// The collection store and the guarded operations on it.
pub struct CollectionsService {
    store: RwLock<BTreeMap<String, Vec<Value>>>,
    hooks: CollectionHooks,
    guards: Guards,
}

impl CollectionsService {
    /// Hooks are fixed at construction; the service is shared read-only
    /// afterwards.
    #[must_use]
    pub fn new(hooks: CollectionHooks) -> Self {
        Self {
            store: RwLock::new(BTreeMap::new()),
            hooks,
            guards: Guards::new(),
        }
    }

    /// # Errors
    /// Authorization, hook or store failure.
    pub async fn list_collections(&self) -> Result<Value, ServiceError> {
        self.dispatch(&self.guards.list, CollectionArgs::none(), |store, _| {
            Ok(json!(store.keys().collect::<Vec<_>>()))
        })
        .await
    }

    /// # Errors
    /// Authorization, hook or store failure.
    pub async fn create_collection(&self, name: &str) -> Result<Value, ServiceError> {
        self.dispatch_mut(&self.guards.create, CollectionArgs::named(name), |store, args| {
            let name = args.name()?;
            if store.contains_key(name) {
                return Err(ServiceError::AlreadyExists(name.to_owned()));
            }
            store.insert(name.to_owned(), Vec::new());
            Ok(json!({ "name": name, "database": DEFAULT_DATABASE }))
        })
        .await
    }

    /// # Errors
    /// Authorization, hook or store failure.
    pub async fn get_collection(&self, name: &str) -> Result<Value, ServiceError> {
        self.dispatch(&self.guards.get, CollectionArgs::named(name), |store, args| {
            let name = args.name()?;
            let records = store
                .get(name)
                .ok_or_else(|| ServiceError::NotFound(name.to_owned()))?;
            Ok(json!({ "name": name, "database": DEFAULT_DATABASE, "count": records.len() }))
        })
        .await
    }

    /// # Errors
    /// Authorization, hook or store failure.
    pub async fn delete_collection(&self, name: &str) -> Result<Value, ServiceError> {
        self.dispatch_mut(&self.guards.delete, CollectionArgs::named(name), |store, args| {
            let name = args.name()?;
            store
                .remove(name)
                .map(|_| json!({ "deleted": name }))
                .ok_or_else(|| ServiceError::NotFound(name.to_owned()))
        })
        .await
    }

    /// # Errors
    /// Authorization, hook or store failure.
    pub async fn add(&self, name: &str, records: Vec<Value>) -> Result<Value, ServiceError> {
        let args = CollectionArgs::named(name).with_records(records);
        self.dispatch_mut(&self.guards.add, args, |store, args| {
            let name = args.name()?;
            let stored = store
                .get_mut(name)
                .ok_or_else(|| ServiceError::NotFound(name.to_owned()))?;
            stored.extend(args.records.iter().cloned());
            Ok(json!({ "added": args.records.len() }))
        })
        .await
    }

    /// # Errors
    /// Authorization, hook or store failure.
    pub async fn count(&self, name: &str) -> Result<Value, ServiceError> {
        self.dispatch(&self.guards.count, CollectionArgs::named(name), |store, args| {
            let name = args.name()?;
            store
                .get(name)
                .map(|records| json!(records.len()))
                .ok_or_else(|| ServiceError::NotFound(name.to_owned()))
        })
        .await
    }

    async fn dispatch<F>(
        &self,
        guard: &AuthzGuard<CollectionArgs>,
        args: CollectionArgs,
        op: F,
    ) -> Result<Value, ServiceError>
    where
        F: FnOnce(&BTreeMap<String, Vec<Value>>, &CollectionArgs) -> Result<Value, ServiceError>,
    {
        guard
            .call(args, |args| {
                self.hooks.run(guard.operation(), args, |args| async move {
                    op(&self.store.read(), &args)
                })
            })
            .await
    }

    async fn dispatch_mut<F>(
        &self,
        guard: &AuthzGuard<CollectionArgs>,
        args: CollectionArgs,
        op: F,
    ) -> Result<Value, ServiceError>
    where
        F: FnOnce(&mut BTreeMap<String, Vec<Value>>, &CollectionArgs) -> Result<Value, ServiceError>,
    {
        guard
            .call(args, |args| {
                self.hooks.run(guard.operation(), args, |args| async move {
                    op(&mut self.store.write(), &args)
                })
            })
            .await
    }
}

/// Logs every collections operation and its outcome.
pub struct LoggingHook;

impl OperationHook<CollectionArgs, Value> for LoggingHook {
    fn name(&self) -> &str {
        "logging"
    }

    fn should_run(&self, _operation: &str) -> bool {
        true
    }

    fn before(&self, operation: &str, args: &mut CollectionArgs) -> anyhow::Result<()> {
        tracing::info!(
            operation,
            collection = args.collection.as_deref().unwrap_or("-"),
            records = args.records.len(),
            "Collections operation started"
        );
        Ok(())
    }

    fn after(&self, operation: &str, result: &mut Value, _args: &CollectionArgs) -> anyhow::Result<()> {
        tracing::debug!(operation, result = %result, "Collections operation finished");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CreateCollectionRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AddRequest {
    records: Vec<Value>,
}

/// Routes of the collections API, including the unauthenticated health
/// endpoints.
#[must_use]
pub fn router(service: Arc<CollectionsService>) -> Router {
    Router::new()
        .route("/api/v1", get(root))
        .route("/api/v1/heartbeat", get(heartbeat))
        .route("/api/v1/version", get(version))
        .route(
            "/api/v1/collections",
            get(list_collections).post(create_collection),
        )
        .route(
            "/api/v1/collections/{name}",
            get(get_collection).delete(delete_collection),
        )
        .route("/api/v1/collections/{name}/add", post(add))
        .route("/api/v1/collections/{name}/count", get(count))
        .with_state(service)
}

async fn root() -> Json<Value> {
    Json(json!({ "service": "gatekeeper", "version": env!("CARGO_PKG_VERSION") }))
}

async fn heartbeat() -> Json<Value> {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    Json(json!({ "nanosecond heartbeat": nanos }))
}

async fn version() -> Json<&'static str> {
    Json(env!("CARGO_PKG_VERSION"))
}

async fn list_collections(
    State(service): State<Arc<CollectionsService>>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(service.list_collections().await?))
}

async fn create_collection(
    State(service): State<Arc<CollectionsService>>,
    Json(req): Json<CreateCollectionRequest>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(service.create_collection(&req.name).await?))
}

async fn get_collection(
    State(service): State<Arc<CollectionsService>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(service.get_collection(&name).await?))
}

async fn delete_collection(
    State(service): State<Arc<CollectionsService>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(service.delete_collection(&name).await?))
}

async fn add(
    State(service): State<Arc<CollectionsService>>,
    Path(name): Path<String>,
    Json(req): Json<AddRequest>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(service.add(&name, req.records).await?))
}

async fn count(
    State(service): State<Arc<CollectionsService>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(service.count(&name).await?))
}
