#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Before/after hooks around named operations.
//!
//! A [`HookDispatcher`] holds an ordered list of [`OperationHook`]s. For each
//! dispatched operation every hook whose [`OperationHook::should_run`] accepts
//! the operation name sees the arguments before the operation runs and the
//! result after it returns. By default a failing (or panicking) hook is logged
//! and skipped; it neither aborts the operation nor the remaining hooks.
//!
//! ```ignore
//! let mut hooks = HookDispatcher::new();
//! hooks.register(Arc::new(AuditHook));
//!
//! let count = hooks
//!     .run("count", args, |args| async move { store.count(&args.collection) })
//!     .await?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod hook;

pub use dispatcher::{HookDispatcher, HookFailurePolicy};
pub use error::{HookError, HookPhase};
pub use hook::OperationHook;
