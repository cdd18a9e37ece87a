use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("invalid validation pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
