//! Core port definitions for ampere adapters.
//!
//! This module exposes the battery port contract used by higher level crates
//! to read the host's battery status without linking directly against a
//! platform backend.

pub mod battery;
