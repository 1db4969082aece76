//! Three-dice statements for "Two Truths and a Lie".
//!
//! `AtLeastTwoSame` and `AllDifferent` are complements, so exactly one of them is
//! false on every roll. `SumAtLeastEleven` is false on every roll summing to 10 or
//! less, which gives those rolls two false statements. The false statement of a
//! roll is the lowest-index false one.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DiceRoll(pub [u8; 3]);

impl DiceRoll {
    pub fn new(values: [u8; 3]) -> Result<Self, ConfigError> {
        if let Some(bad) = values.iter().find(|v| !(1..=6).contains(*v)) {
            return Err(ConfigError::DieOutOfRange(*bad));
        }
        Ok(Self(values))
    }

    pub fn sum(&self) -> u8 {
        self.0.iter().sum()
    }

    /// Every ordered roll of three dice.
    pub fn all() -> impl Iterator<Item = DiceRoll> {
        (1..=6u8).flat_map(|a| {
            (1..=6u8).flat_map(move |b| (1..=6u8).map(move |c| DiceRoll([a, b, c])))
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Statement {
    AtLeastTwoSame,
    SumAtLeastEleven,
    AllDifferent,
}

impl Statement {
    pub const ALL: [Statement; 3] = [
        Statement::AtLeastTwoSame,
        Statement::SumAtLeastEleven,
        Statement::AllDifferent,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::AtLeastTwoSame => 0,
            Self::SumAtLeastEleven => 1,
            Self::AllDifferent => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AtLeastTwoSame => "At least 2 same",
            Self::SumAtLeastEleven => "Sum >= 11",
            Self::AllDifferent => "All different",
        }
    }

    pub fn holds(self, roll: DiceRoll) -> bool {
        let [a, b, c] = roll.0;
        match self {
            Self::AtLeastTwoSame => a == b || b == c || a == c,
            Self::SumAtLeastEleven => roll.sum() >= 11,
            Self::AllDifferent => a != b && b != c && a != c,
        }
    }
}

/// Truth value of each statement, in `Statement::ALL` order.
pub fn evaluate_statements(roll: DiceRoll) -> [bool; 3] {
    Statement::ALL.map(|statement| statement.holds(roll))
}

pub fn false_count(roll: DiceRoll) -> usize {
    evaluate_statements(roll).iter().filter(|held| !**held).count()
}

/// Lowest-index false statement.
pub fn false_statement(roll: DiceRoll) -> Statement {
    let truths = evaluate_statements(roll);
    if !truths[0] {
        Statement::AtLeastTwoSame
    } else if !truths[1] {
        Statement::SumAtLeastEleven
    } else {
        // the first two held, so the roll has a pair and AllDifferent is false
        Statement::AllDifferent
    }
}

/// How often each statement is the false one over all 216 rolls.
pub fn false_statement_frequencies() -> [usize; 3] {
    let mut counts = [0usize; 3];
    for roll in DiceRoll::all() {
        counts[false_statement(roll).index()] += 1;
    }
    counts
}
