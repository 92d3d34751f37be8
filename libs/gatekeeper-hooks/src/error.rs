use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Before,
    After,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

/// A hook failed while the dispatcher runs with
/// [`HookFailurePolicy::Propagate`](crate::HookFailurePolicy::Propagate).
#[derive(Debug, Error)]
#[error("{phase} hook '{hook}' failed on '{operation}': {source:#}")]
pub struct HookError {
    pub hook: String,
    pub operation: String,
    pub phase: HookPhase,
    #[source]
    pub source: anyhow::Error,
}
