//! Rule store: the live rule snapshot.
//!
//! Writers compile a complete new [`RuleSet`] and publish it with a single
//! atomic pointer swap. Readers take an `Arc` to whatever snapshot is current
//! and keep it for the whole evaluation, so they observe either the old or
//! the new sequence, never a mix.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use urlguard_core::error::Result;
use urlguard_core::{Rule, RuleSet};

use crate::obs::FilterMetrics;

/// Supplies the current rule snapshot at evaluation time.
pub trait RuleSource: Send + Sync {
    fn snapshot(&self) -> Arc<RuleSet>;
}

/// In-memory rule store with copy-on-write publication.
pub struct RuleStore {
    current: ArcSwap<RuleSet>,
    version: AtomicU64,
    /// Serializes writers so versions track publish order.
    write_lock: Mutex<()>,
    /// Broken-pattern gauge tracks whatever snapshot is live.
    metrics: Option<Arc<FilterMetrics>>,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore {
    /// Empty store (blocks nothing) at version 0.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(RuleSet::default()),
            version: AtomicU64::new(0),
            write_lock: Mutex::new(()),
            metrics: None,
        }
    }

    /// Report every installed snapshot to `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<FilterMetrics>) -> Self {
        metrics.broken_patterns.set(&[], 0);
        self.metrics = Some(metrics);
        self
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Compile and publish `rules`. Patterns that do not compile are logged
    /// and their rules fail open. Returns the new version.
    pub fn publish(&self, rules: Vec<Rule>) -> u64 {
        let set = RuleSet::compile(rules);
        for d in set.diagnostics() {
            tracing::warn!(
                rule = d.rule,
                field = %d.field,
                pattern = %d.pattern,
                reason = %d.reason,
                "rule pattern does not compile; rule fails open"
            );
        }
        self.install(set)
    }

    /// Publish only if every pattern compiles. On error the live snapshot is
    /// left untouched.
    pub fn publish_strict(&self, rules: Vec<Rule>) -> Result<u64> {
        let set = RuleSet::compile_strict(rules)?;
        Ok(self.install(set))
    }

    fn install(&self, set: RuleSet) -> u64 {
        // Poisoned lock only means another writer panicked mid-publish; the
        // swap itself is atomic, so keep going.
        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());
        let rules = set.len();
        let broken = set.diagnostics().len();
        self.current.store(Arc::new(set));
        if let Some(m) = &self.metrics {
            m.broken_patterns.set(&[], broken as i64);
        }
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::info!(version, rules, broken, "rule snapshot published");
        version
    }
}

impl RuleSource for RuleStore {
    fn snapshot(&self) -> Arc<RuleSet> {
        self.current.load_full()
    }
}
