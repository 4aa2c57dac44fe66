//! Logging helpers shared by the engine.

pub mod hidden;

pub use hidden::Hidden;
