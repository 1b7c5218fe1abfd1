//! Shared contracts for ampere crates.
//!
//! Holds the configuration schema and the battery port consumed by the core
//! service layer. Nothing in here talks to the platform directly.

pub mod config;
pub mod ports;
