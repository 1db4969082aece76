use crate::{ConfigError, Direction, Rank};
use serde::{Deserialize, Serialize};

/// Payouts for a correct call. Higher/Lower pay by the reference ordinal; Tie is flat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayoutTable {
    /// Indexed by ordinal - 1 (A..K).
    pub higher_lower: [u32; 13],
    pub tie: u32,
}

impl PayoutTable {
    pub fn payout(&self, reference: Rank, direction: Direction) -> u32 {
        match direction {
            Direction::Higher | Direction::Lower => self.higher_lower[reference.index()],
            Direction::Tie => self.tie,
        }
    }

    /// Lookup by raw ordinal; anything outside 1..=13 is a configuration error.
    pub fn payout_for(&self, ordinal: u8, direction: Direction) -> Result<u32, ConfigError> {
        let rank = Rank::from_value(ordinal)?;
        Ok(self.payout(rank, direction))
    }
}

/// Cost and payout table for one guess/reveal cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageRules {
    pub cost: u32,
    pub payouts: PayoutTable,
}
