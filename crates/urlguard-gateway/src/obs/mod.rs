//! Lightweight in-process metrics.
//!
//! Decision counts, rule publishes, broken-pattern gauge, and evaluation
//! latency. Stored as atomics and rendered by the `/metrics` handler.

pub mod metrics;

pub use metrics::FilterMetrics;
