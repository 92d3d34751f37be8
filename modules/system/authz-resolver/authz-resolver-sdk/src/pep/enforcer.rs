//! Policy enforcement around business operations.
//!
//! [`AuthzGuard`] runs the full check for one operation:
//! read the request scope → resolve the resource → ask the decision
//! provider → run the operation only on `allow`.
//!
//! Constructed once per operation during service initialisation. The action
//! is fixed; the resource is either fixed or derived from the call's
//! arguments by a resolver that is only invoked when a check actually runs.

use std::future::Future;
use std::sync::Arc;

use gatekeeper_security::{AuthorizationContext, AuthzAction, AuthzResource, AuthzUser};

use crate::error::AuthorizationError;
use crate::scope::RequestScope;

/// Derives the resource of a call from the operation name and its arguments.
pub type ResourceResolver<A> = Arc<dyn Fn(&str, &A) -> AuthzResource + Send + Sync>;

/// The resource an operation acts on.
pub enum ResourceSpec<A> {
    Static(AuthzResource),
    Dynamic(ResourceResolver<A>),
}

impl<A> ResourceSpec<A> {
    #[must_use]
    pub fn dynamic<F>(resolver: F) -> Self
    where
        F: Fn(&str, &A) -> AuthzResource + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(resolver))
    }

    #[must_use]
    pub fn resolve(&self, operation: &str, args: &A) -> AuthzResource {
        match self {
            Self::Static(resource) => resource.clone(),
            Self::Dynamic(resolver) => resolver(operation, args),
        }
    }
}

impl<A> Clone for ResourceSpec<A> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(resource) => Self::Static(resource.clone()),
            Self::Dynamic(resolver) => Self::Dynamic(Arc::clone(resolver)),
        }
    }
}

impl<A> From<AuthzResource> for ResourceSpec<A> {
    fn from(resource: AuthzResource) -> Self {
        Self::Static(resource)
    }
}

impl<A> std::fmt::Debug for ResourceSpec<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(resource) => f.debug_tuple("Static").field(resource).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// What a guard does when it runs outside any request scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingScopePolicy {
    /// Skip the check and run the operation. Internal callers that never pass
    /// through the HTTP middleware stack (startup tasks, background jobs) rely
    /// on this.
    #[default]
    Allow,
    /// Refuse with [`AuthorizationError::MissingScope`].
    Deny,
}

/// Authorization check attached to one business operation.
///
/// # Example
///
/// ```ignore
/// use authz_resolver_sdk::{pep::AuthzGuard, resources::{self, DataAction}};
///
/// let guard = AuthzGuard::dynamic("count", DataAction::Count, |_, name: &String| {
///     resources::collection(name.as_str())
/// });
///
/// let n = guard.call(name, |name| async move { store.count(&name) }).await?;
/// ```
pub struct AuthzGuard<A> {
    operation: String,
    action: AuthzAction,
    resource: ResourceSpec<A>,
    missing_scope: MissingScopePolicy,
}

impl<A> AuthzGuard<A> {
    #[must_use]
    pub fn new(
        operation: impl Into<String>,
        action: impl Into<AuthzAction>,
        resource: impl Into<ResourceSpec<A>>,
    ) -> Self {
        Self {
            operation: operation.into(),
            action: action.into(),
            resource: resource.into(),
            missing_scope: MissingScopePolicy::default(),
        }
    }

    /// Guard whose resource is computed from each call's arguments.
    #[must_use]
    pub fn dynamic<F>(
        operation: impl Into<String>,
        action: impl Into<AuthzAction>,
        resolver: F,
    ) -> Self
    where
        F: Fn(&str, &A) -> AuthzResource + Send + Sync + 'static,
    {
        Self::new(operation, action, ResourceSpec::dynamic(resolver))
    }

    /// Fail closed when no request scope is active.
    #[must_use]
    pub fn deny_without_scope(mut self) -> Self {
        self.missing_scope = MissingScopePolicy::Deny;
        self
    }

    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    #[must_use]
    pub fn action(&self) -> &AuthzAction {
        &self.action
    }

    #[must_use]
    pub fn missing_scope_policy(&self) -> MissingScopePolicy {
        self.missing_scope
    }

    /// Check the current request against this guard.
    ///
    /// # Errors
    ///
    /// - [`AuthorizationError::Denied`] if the decision provider refuses
    /// - [`AuthorizationError::Evaluation`] if the decision provider fails
    /// - [`AuthorizationError::MissingScope`] if no scope is active and the
    ///   guard was built with [`deny_without_scope`](Self::deny_without_scope)
    pub async fn authorize(&self, args: &A) -> Result<(), AuthorizationError> {
        let Some(scope) = RequestScope::current() else {
            return match self.missing_scope {
                MissingScopePolicy::Allow => {
                    tracing::trace!(
                        operation = %self.operation,
                        "No request scope; running operation unchecked"
                    );
                    Ok(())
                }
                MissingScopePolicy::Deny => Err(AuthorizationError::MissingScope {
                    operation: self.operation.clone(),
                }),
            };
        };

        let context = AuthorizationContext::new(
            AuthzUser::from_identity(scope.identity()),
            self.resource.resolve(&self.operation, args),
            self.action.clone(),
        );

        let allowed = scope.provider().authorize(&context).await.map_err(|e| {
            tracing::error!(
                operation = %self.operation,
                user_id = %context.user.id,
                error = %e,
                "Authorization provider failed"
            );
            AuthorizationError::from(e)
        })?;

        if allowed {
            tracing::debug!(
                operation = %self.operation,
                user_id = %context.user.id,
                resource_type = %context.resource.resource_type,
                action = %context.action.id,
                "Access allowed"
            );
            Ok(())
        } else {
            tracing::debug!(
                operation = %self.operation,
                user_id = %context.user.id,
                resource_type = %context.resource.resource_type,
                action = %context.action.id,
                "Access denied"
            );
            Err(AuthorizationError::Denied {
                user: context.user.id,
                resource_type: context.resource.resource_type,
                action: context.action.id,
            })
        }
    }

    /// Authorize, then run `f` with the same arguments.
    ///
    /// `f` is never invoked when the check fails.
    ///
    /// # Errors
    /// Any [`AuthorizationError`] from the check, converted into `E`, or the
    /// error returned by `f`.
    pub async fn call<F, Fut, R, E>(&self, args: A, f: F) -> Result<R, E>
    where
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: From<AuthorizationError>,
    {
        self.authorize(&args).await?;
        f(args).await
    }

    /// Bind `f` to this guard, producing a callable with the same shape.
    #[must_use]
    pub fn wrap<F>(self, f: F) -> Authorized<A, F> {
        Authorized {
            guard: Arc::new(self),
            f,
        }
    }
}

impl<A> std::fmt::Debug for AuthzGuard<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthzGuard")
            .field("operation", &self.operation)
            .field("action", &self.action)
            .field("resource", &self.resource)
            .field("missing_scope", &self.missing_scope)
            .finish()
    }
}

/// An operation bound to its [`AuthzGuard`]. See [`AuthzGuard::wrap`].
pub struct Authorized<A, F> {
    guard: Arc<AuthzGuard<A>>,
    f: F,
}

impl<A, F> Authorized<A, F> {
    #[must_use]
    pub fn guard(&self) -> &AuthzGuard<A> {
        &self.guard
    }

    /// # Errors
    /// See [`AuthzGuard::call`].
    pub async fn call<Fut, R, E>(&self, args: A) -> Result<R, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: From<AuthorizationError>,
    {
        self.guard.authorize(&args).await?;
        (self.f)(args).await
    }
}

impl<A, F: Clone> Clone for Authorized<A, F> {
    fn clone(&self) -> Self {
        Self {
            guard: Arc::clone(&self.guard),
            f: self.f.clone(),
        }
    }
}

impl<A, F> std::fmt::Debug for Authorized<A, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorized")
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}
