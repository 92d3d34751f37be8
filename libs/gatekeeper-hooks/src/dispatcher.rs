use std::any::Any;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::error;

use crate::error::{HookError, HookPhase};
use crate::hook::OperationHook;

/// What a hook failure does to the dispatched operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HookFailurePolicy {
    /// Log the failure and carry on with the next hook and the operation.
    #[default]
    Isolate,
    /// Stop dispatching and fail the operation with a [`HookError`].
    Propagate,
}

/// Ordered list of hooks for operations taking `A` and returning `R`.
///
/// Hooks run in registration order. Registration needs `&mut self`, so all
/// hooks must be registered before the dispatcher is shared with request
/// handlers; adding hooks while traffic is flowing is not supported.
pub struct HookDispatcher<A, R> {
    hooks: Vec<Arc<dyn OperationHook<A, R>>>,
    policy: HookFailurePolicy,
}

impl<A, R> Default for HookDispatcher<A, R> {
    fn default() -> Self {
        Self {
            hooks: Vec::new(),
            policy: HookFailurePolicy::default(),
        }
    }
}

impl<A, R> HookDispatcher<A, R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: HookFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn register(&mut self, hook: Arc<dyn OperationHook<A, R>>) {
        self.hooks.push(hook);
    }

    #[must_use]
    pub fn policy(&self) -> HookFailurePolicy {
        self.policy
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run the `before` hook of every hook interested in `operation`.
    ///
    /// # Errors
    /// Only with [`HookFailurePolicy::Propagate`]: the first hook failure.
    pub fn run_before(&self, operation: &str, args: &mut A) -> Result<(), HookError> {
        for hook in &self.hooks {
            let outcome = guarded(|| {
                if hook.should_run(operation) {
                    hook.before(operation, args)
                } else {
                    Ok(())
                }
            });
            self.settle(hook.name(), operation, HookPhase::Before, outcome)?;
        }
        Ok(())
    }

    /// Run the `after` hook of every hook interested in `operation`.
    ///
    /// # Errors
    /// Only with [`HookFailurePolicy::Propagate`]: the first hook failure.
    pub fn run_after(&self, operation: &str, result: &mut R, args: &A) -> Result<(), HookError> {
        for hook in &self.hooks {
            let outcome = guarded(|| {
                if hook.should_run(operation) {
                    hook.after(operation, result, args)
                } else {
                    Ok(())
                }
            });
            self.settle(hook.name(), operation, HookPhase::After, outcome)?;
        }
        Ok(())
    }

    /// Dispatch `before` hooks, run `f` exactly once, then dispatch `after`
    /// hooks on its successful result.
    ///
    /// `f` receives the arguments as adjusted by the `before` hooks. When `f`
    /// fails its error is returned as is and no `after` hook runs.
    ///
    /// # Errors
    /// The operation's own error, or a [`HookError`] under
    /// [`HookFailurePolicy::Propagate`].
    pub async fn run<F, Fut, E>(&self, operation: &str, mut args: A, f: F) -> Result<R, E>
    where
        A: Clone,
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: From<HookError>,
    {
        self.run_before(operation, &mut args)?;
        let mut result = f(args.clone()).await?;
        self.run_after(operation, &mut result, &args)?;
        Ok(result)
    }

    fn settle(
        &self,
        hook: &str,
        operation: &str,
        phase: HookPhase,
        outcome: anyhow::Result<()>,
    ) -> Result<(), HookError> {
        let Err(source) = outcome else {
            return Ok(());
        };

        error!(
            hook,
            operation,
            phase = %phase,
            error = format!("{source:#}"),
            "Operation hook failed"
        );

        match self.policy {
            HookFailurePolicy::Isolate => Ok(()),
            HookFailurePolicy::Propagate => Err(HookError {
                hook: hook.to_owned(),
                operation: operation.to_owned(),
                phase,
                source,
            }),
        }
    }
}

/// Run one hook call, turning a panic into an ordinary failure.
fn guarded(call: impl FnOnce() -> anyhow::Result<()>) -> anyhow::Result<()> {
    catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        Err(anyhow::anyhow!(
            "hook panicked: {}",
            panic_message(&*payload)
        ))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
