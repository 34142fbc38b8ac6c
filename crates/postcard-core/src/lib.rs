//! # Postcard Core
//!
//! The domain layer of the postcard relay.
//! This crate contains the submission model, store keys and the ports that
//! infrastructure must implement. It performs no I/O.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::DomainError;
