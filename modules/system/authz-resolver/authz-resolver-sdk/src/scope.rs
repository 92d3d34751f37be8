//! Request-scoped authorization context.
//!
//! The authorization middleware publishes a [`RequestScope`] for the task
//! handling a request. Code running later in that task, across any number of
//! `.await` points, reads it with [`RequestScope::current`]. Each request's
//! task sees only its own scope, and the scope is dropped with the task.
//!
//! Task-locals are not inherited by spawned tasks. To carry the scope into
//! `tokio::spawn`ed work, capture it and re-enter it explicitly:
//!
//! ```ignore
//! let scope = RequestScope::current();
//! tokio::spawn(async move {
//!     match scope {
//!         Some(scope) => scope.run(work()).await,
//!         None => work().await,
//!     }
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use gatekeeper_security::Identity;
use http::Method;

use crate::plugin_api::AuthorizationProvider;

tokio::task_local! {
    static REQUEST_SCOPE: RequestScope;
}

/// What authorization needs to know about the request being handled.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub path: String,
    pub identity: Option<Identity>,
}

impl RequestInfo {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, identity: Option<Identity>) -> Self {
        Self {
            method,
            path: path.into(),
            identity,
        }
    }
}

/// The current request together with the active decision provider.
#[derive(Clone)]
pub struct RequestScope {
    request: Arc<RequestInfo>,
    provider: Arc<dyn AuthorizationProvider>,
}

impl RequestScope {
    #[must_use]
    pub fn new(request: RequestInfo, provider: Arc<dyn AuthorizationProvider>) -> Self {
        Self {
            request: Arc::new(request),
            provider,
        }
    }

    /// The scope of the request the current task is handling, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        REQUEST_SCOPE.try_with(Clone::clone).ok()
    }

    /// Whether the current task runs inside a request scope.
    #[must_use]
    pub fn is_active() -> bool {
        REQUEST_SCOPE.try_with(|_| ()).is_ok()
    }

    /// Run `fut` with this scope as the current one.
    pub fn run<F: Future>(self, fut: F) -> impl Future<Output = F::Output> {
        REQUEST_SCOPE.scope(self, fut)
    }

    #[must_use]
    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.request.identity.as_ref()
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<dyn AuthorizationProvider> {
        &self.provider
    }
}

impl std::fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestScope")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::error::AuthZProviderError;
    use async_trait::async_trait;
    use gatekeeper_security::AuthorizationContext;
    use std::time::Duration;

    struct AllowAll;

    #[async_trait]
    impl AuthorizationProvider for AllowAll {
        async fn authorize(&self, _: &AuthorizationContext) -> Result<bool, AuthZProviderError> {
            Ok(true)
        }
    }

    fn scope_for(user: &str) -> RequestScope {
        RequestScope::new(
            RequestInfo::new(Method::GET, "/api/v1/collections", Some(Identity::new(user))),
            Arc::new(AllowAll),
        )
    }

    fn current_user() -> Option<String> {
        RequestScope::current().and_then(|s| s.identity().map(|i| i.user_id().to_owned()))
    }

    #[test]
    fn no_scope_outside_requests() {
        assert!(RequestScope::current().is_none());
        assert!(!RequestScope::is_active());
    }

    #[tokio::test]
    async fn scope_survives_await_points() {
        let user = scope_for("alice")
            .run(async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                tokio::task::yield_now().await;
                current_user()
            })
            .await;

        assert_eq!(user.as_deref(), Some("alice"));
        assert!(RequestScope::current().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_scopes_are_isolated() {
        let handles: Vec<_> = (0..16)
            .map(|n| {
                let user = format!("user-{n}");
                tokio::spawn(scope_for(&user).run(async move {
                    for _ in 0..10 {
                        tokio::task::yield_now().await;
                        assert_eq!(current_user().as_deref(), Some(user.as_str()));
                    }
                    user
                }))
            })
            .collect();

        for (n, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), format!("user-{n}"));
        }
    }

    #[tokio::test]
    async fn spawned_tasks_do_not_inherit_scope_unless_re_entered() {
        scope_for("bob")
            .run(async {
                let inherited = tokio::spawn(async { current_user() }).await.unwrap();
                assert_eq!(inherited, None);

                let scope = RequestScope::current().unwrap();
                let carried = tokio::spawn(scope.run(async { current_user() }))
                    .await
                    .unwrap();
                assert_eq!(carried.as_deref(), Some("bob"));
            })
            .await;
    }
}
