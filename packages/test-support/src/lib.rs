//! Shared helpers for the engine's integration tests and the simulator's
//! tests: one-time logging setup and unique, valid player names.

pub mod logging;
pub mod unique_helpers;

pub use unique_helpers::{numbered_names, unique_names, unique_str};
