//! Top-level facade crate for urlguard.
//!
//! Re-exports the rule engine and the gateway library so users can depend on a single crate.

pub mod core {
    pub use urlguard_core::*;
}

pub mod gateway {
    pub use urlguard_gateway::*;
}
