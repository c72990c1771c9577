//! urlguard gateway library entry.
//!
//! Wires the rule store, identity source, filter middleware, admin API, and
//! metrics into an axum stack. Consumed by the binary (`main.rs`) and by
//! integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod admin;
pub mod app_state;
pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod obs;
pub mod router;
pub mod store;
