//! Shared application state for the urlguard gateway.
//!
//! Holds the two collaborators the filter consults on every request (rule
//! source, identity source) plus metrics. Startup errors are returned, not
//! panicked on.

use std::sync::Arc;

use urlguard_core::error::Result;

use crate::config::GatewayConfig;
use crate::identity::{HeaderIdentity, IdentitySource};
use crate::obs::FilterMetrics;
use crate::store::{RuleSource, RuleStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    /// Write side, used by the admin API.
    rules: Arc<RuleStore>,
    /// Read side, consulted by the filter on every request.
    rule_source: Arc<dyn RuleSource>,
    identity: Arc<dyn IdentitySource>,
    metrics: Arc<FilterMetrics>,
}

struct AppStateInner {
    cfg: GatewayConfig,
}

impl AppState {
    /// Build state from a validated config and publish its initial rules.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let identity = HeaderIdentity::from_config(&cfg.identity)?;
        Ok(Self::with_identity(cfg, Arc::new(identity)))
    }

    /// Same as [`AppState::new`] with a caller-supplied identity source.
    pub fn with_identity(cfg: GatewayConfig, identity: Arc<dyn IdentitySource>) -> Self {
        let metrics = Arc::new(FilterMetrics::default());
        let rules = Arc::new(RuleStore::new().with_metrics(Arc::clone(&metrics)));
        rules.publish(cfg.rules.clone());

        Self {
            inner: Arc::new(AppStateInner { cfg }),
            rule_source: Arc::clone(&rules) as Arc<dyn RuleSource>,
            rules,
            identity,
            metrics,
        }
    }

    /// Let the filter read rules from `source` instead of the built-in store.
    /// The admin API keeps operating on the built-in store.
    pub fn with_rule_source(mut self, source: Arc<dyn RuleSource>) -> Self {
        self.rule_source = source;
        self
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn rules(&self) -> Arc<RuleStore> {
        Arc::clone(&self.rules)
    }

    pub fn rule_source(&self) -> Arc<dyn RuleSource> {
        Arc::clone(&self.rule_source)
    }

    pub fn identity(&self) -> Arc<dyn IdentitySource> {
        Arc::clone(&self.identity)
    }

    pub fn metrics(&self) -> Arc<FilterMetrics> {
        Arc::clone(&self.metrics)
    }
}
