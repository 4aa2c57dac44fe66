pub mod config;
pub mod domain;

#[cfg(test)]
mod tests_error_display;

pub use config::ConfigError;
pub use domain::{DomainError, ValidationKind};
