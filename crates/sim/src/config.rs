use crate::{SimError, StrategyKind};
use serde::{Deserialize, Serialize};
use wagerlab_core::ConfigError;

/// Which cards a policy may count as still unseen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PoolTracking {
    /// A full deck minus the cards revealed in the current round.
    #[default]
    Round,
    /// The cards actually left in the draw pile.
    Deck,
}

impl PoolTracking {
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "round" => Some(Self::Round),
            "deck" | "shoe" => Some(Self::Deck),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Chance of riding a won stage into the next one.
    pub continue_probability: f64,
    pub pool_tracking: PoolTracking,
    /// Seeds the continuation coin.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            continue_probability: 0.5,
            pool_tracking: PoolTracking::Round,
            seed: 0xC0FFEE,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(0.0..=1.0).contains(&self.continue_probability) {
            return Err(ConfigError::InvalidProbability(self.continue_probability).into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub seed: u64,
    pub rounds: u64,
    /// Independent workers, each with its own deck and RNG streams.
    pub shards: usize,
    pub strategies: Vec<StrategyKind>,
    pub engine: EngineConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            rounds: 1_000_000,
            shards: 1,
            strategies: vec![StrategyKind::Random, StrategyKind::ExpectedValue],
            engine: EngineConfig::default(),
        }
    }
}
