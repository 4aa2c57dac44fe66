use thiserror::Error;

/// Environment configuration that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}' ({reason})")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid_var(name: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidVar {
            name,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
