//! Service implementation for the RBAC authorization provider.

use std::sync::Arc;

use arc_swap::ArcSwap;
use authz_resolver_sdk::AuthorizationConfigProvider;
use gatekeeper_security::AuthorizationContext;
use tracing::{info, warn};

use super::policy::{PolicyError, RbacPolicy};

/// Role-based authorizer.
///
/// Decisions read the current [`RbacPolicy`] without locking. [`reload`]
/// compiles a fresh policy from the configuration provider and swaps it in
/// whole; in-flight checks keep the policy they started with.
///
/// [`reload`]: SimpleRbacAuthorizer::reload
pub struct SimpleRbacAuthorizer {
    policy: ArcSwap<RbacPolicy>,
    config_provider: Arc<dyn AuthorizationConfigProvider>,
}

impl SimpleRbacAuthorizer {
    /// Load and compile the initial policy.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be loaded or compiled.
    pub fn new(config_provider: Arc<dyn AuthorizationConfigProvider>) -> Result<Self, PolicyError> {
        let policy = load(config_provider.as_ref())?;
        info!(grants = policy.len(), "RBAC policy compiled");
        Ok(Self {
            policy: ArcSwap::from_pointee(policy),
            config_provider,
        })
    }

    /// Current policy snapshot.
    #[must_use]
    pub fn policy(&self) -> Arc<RbacPolicy> {
        self.policy.load_full()
    }

    #[must_use]
    pub fn is_allowed(&self, ctx: &AuthorizationContext) -> bool {
        self.policy.load().allows(ctx)
    }

    /// Re-read the configuration and replace the active policy.
    ///
    /// Returns the number of grants in the new policy.
    ///
    /// # Errors
    /// Returns an error if loading or compiling fails; the previous policy
    /// stays active.
    pub fn reload(&self) -> Result<usize, PolicyError> {
        let policy = load(self.config_provider.as_ref()).inspect_err(|e| {
            warn!(error = %e, "RBAC policy reload failed; keeping previous policy");
        })?;
        let grants = policy.len();
        self.policy.store(Arc::new(policy));
        info!(grants, "RBAC policy reloaded");
        Ok(grants)
    }
}

fn load(provider: &dyn AuthorizationConfigProvider) -> Result<RbacPolicy, PolicyError> {
    let config = provider.configuration()?;
    RbacPolicy::compile(&config)
}
