/// Command-line error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid script step '{step}': {reason}")]
    Script { step: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub(crate) fn script(step: &str, reason: impl Into<String>) -> Self {
        Self::Script {
            step: step.to_string(),
            reason: reason.into(),
        }
    }
}
