//! Authentication implementations.

mod basic;

pub use basic::{BasicAuthConfig, BasicAuthGate};
