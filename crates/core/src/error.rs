use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("rank ordinal {0} outside 1..=13")]
    RankOutOfRange(u8),
    #[error("die value {0} outside 1..=6")]
    DieOutOfRange(u8),
    #[error("malformed deck: {0}")]
    MalformedDeck(String),
    #[error("invalid rules: {0}")]
    InvalidRules(String),
    #[error("continuation probability {0} outside 0..=1")]
    InvalidProbability(f64),
}
