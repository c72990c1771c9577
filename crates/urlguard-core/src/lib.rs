//! urlguard core: rule data model, compiled rule snapshots, and the filter engine.
//!
//! This crate decides whether a request path is blocked for a principal. It
//! carries no transport or runtime dependencies so the same engine can sit
//! behind any host integration.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A malformed rule must never take down request handling: broken patterns
//! degrade to "never matches" instead of surfacing as errors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod engine;
pub mod error;
pub mod rule;

pub use engine::{evaluate, Decision, PatternDiagnostic, RuleSet};
/// Shared result type.
pub use error::{Result, UrlGuardError};
pub use rule::{PatternField, Rule};
