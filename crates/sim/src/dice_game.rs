//! "Two Truths and a Lie": three dice, three statements, name the false one.

use crate::SimError;
use serde::{Deserialize, Serialize};
use wagerlab_core::{
    false_statement, false_statement_frequencies, CardSource, DiceRoll, DiceRules, RngState,
    Statement,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiceOutcome {
    pub roll: DiceRoll,
    pub false_statement: Statement,
    pub guess: Statement,
    pub wagered: u32,
    pub payout: u32,
    pub net_result: i64,
    pub won: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiceStrategyKind {
    /// Uniform over the three statements.
    Random,
    /// Always names the statement most often false over all 216 rolls.
    MostLikely,
}

impl DiceStrategyKind {
    pub const ALL: [DiceStrategyKind; 2] = [DiceStrategyKind::Random, DiceStrategyKind::MostLikely];

    pub fn from_keyword(value: &str) -> Result<Self, SimError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "likely" | "most_likely" | "optimal" | "ev" => Ok(Self::MostLikely),
            other => Err(SimError::UnknownStrategy(other.to_string())),
        }
    }

    pub fn report_key(self) -> &'static str {
        match self {
            Self::Random => "random_strategy",
            Self::MostLikely => "most_likely_strategy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Random => "Random (33% per statement)",
            Self::MostLikely => "Most Likely Lie (fixed guess from roll frequencies)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiceStrategy {
    kind: DiceStrategyKind,
    rng: RngState,
    favourite: Statement,
}

impl DiceStrategy {
    pub fn new(kind: DiceStrategyKind, seed: u64) -> Self {
        let counts = false_statement_frequencies();
        let mut favourite = Statement::ALL[0];
        for statement in Statement::ALL {
            if counts[statement.index()] > counts[favourite.index()] {
                favourite = statement;
            }
        }
        Self {
            kind,
            rng: RngState::from_seed(seed),
            favourite,
        }
    }

    pub fn kind(&self) -> DiceStrategyKind {
        self.kind
    }

    pub fn choose(&mut self) -> Statement {
        match self.kind {
            DiceStrategyKind::Random => Statement::ALL[self.rng.index(Statement::ALL.len())],
            DiceStrategyKind::MostLikely => self.favourite,
        }
    }
}

/// Settles a guess against a known roll.
pub fn settle_dice(rules: DiceRules, roll: DiceRoll, guess: Statement) -> DiceOutcome {
    let lie = false_statement(roll);
    let won = lie == guess;
    let payout = if won { rules.payout } else { 0 };
    DiceOutcome {
        roll,
        false_statement: lie,
        guess,
        wagered: rules.cost,
        payout,
        net_result: i64::from(payout) - i64::from(rules.cost),
        won,
    }
}

pub fn play_dice_round(
    rules: DiceRules,
    source: &mut CardSource,
    strategy: &mut DiceStrategy,
) -> DiceOutcome {
    let roll = source.roll_three();
    let guess = strategy.choose();
    settle_dice(rules, roll, guess)
}
