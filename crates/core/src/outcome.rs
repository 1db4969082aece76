use crate::{Card, Suit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Higher,
    Lower,
    Tie,
}

impl Direction {
    /// Tie-break priority: the first entry reaching a maximum wins.
    pub const ALL: [Direction; 3] = [Direction::Higher, Direction::Lower, Direction::Tie];

    pub fn index(self) -> usize {
        match self {
            Self::Higher => 0,
            Self::Lower => 1,
            Self::Tie => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Higher => "higher",
            Self::Lower => "lower",
            Self::Tie => "tie",
        }
    }

    /// Accepts full words and single-letter shorthands, case-insensitive.
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "h" | "higher" => Some(Self::Higher),
            "l" | "lower" => Some(Self::Lower),
            "t" | "tie" => Some(Self::Tie),
            _ => None,
        }
    }
}

/// Classifies `drawn` against `reference` by ordinal value.
pub fn classify(reference: u8, drawn: u8) -> Direction {
    if drawn > reference {
        Direction::Higher
    } else if drawn < reference {
        Direction::Lower
    } else {
        Direction::Tie
    }
}

pub fn classify_cards(reference: Card, drawn: Card) -> Direction {
    classify(reference.value(), drawn.value())
}

/// A player's call for the next card. `suit` is only honoured by suit-granular games.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Guess {
    pub direction: Direction,
    #[serde(default)]
    pub suit: Option<Suit>,
}

impl Guess {
    pub fn direction(direction: Direction) -> Self {
        Self {
            direction,
            suit: None,
        }
    }

    pub fn suited(direction: Direction, suit: Suit) -> Self {
        Self {
            direction,
            suit: Some(suit),
        }
    }

    /// Whether the guess wins. With a suit the drawn card must also match it.
    pub fn wins(&self, reference: Card, drawn: Card) -> bool {
        if classify_cards(reference, drawn) != self.direction {
            return false;
        }
        match self.suit {
            Some(suit) => drawn.suit == suit,
            None => true,
        }
    }

    pub fn label(&self) -> String {
        match self.suit {
            Some(suit) => format!("{} {}", self.direction.name(), suit.name()),
            None => self.direction.name().to_string(),
        }
    }
}
