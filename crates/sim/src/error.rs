use thiserror::Error;
use wagerlab_core::ConfigError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid guess: {0}")]
    InvalidGuess(String),
    #[error("invalid round step: {0}")]
    InvalidStep(String),
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
}

impl From<std::io::Error> for SimError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}
