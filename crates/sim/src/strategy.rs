use crate::SimError;
use serde::{Deserialize, Serialize};
use wagerlab_core::{Card, Direction, Granularity, Guess, Pool, RngState, StageRules, Suit};

/// Everything a policy may look at before calling the next card.
#[derive(Debug, Clone, Copy)]
pub struct Decision<'a> {
    pub reference: Card,
    /// Unseen cards; never contains the reference or earlier reveals of the round.
    pub pool: &'a Pool,
    pub stage: &'a StageRules,
    pub granularity: Granularity,
}

impl Decision<'_> {
    /// Cards in the pool that make `guess` win.
    pub fn winning_count(&self, guess: Guess) -> usize {
        let rank = self.reference.rank;
        match guess.suit {
            Some(suit) => self
                .pool
                .suit_direction_counts(rank, suit)
                .get(guess.direction),
            None => self.pool.direction_counts(rank).get(guess.direction),
        }
    }

    pub fn payout(&self, guess: Guess) -> u32 {
        self.stage.payouts.payout(self.reference.rank, guess.direction)
    }

    /// `P(win) * payout - P(lose) * cost` over the exact pool composition.
    pub fn expected_value(&self, guess: Guess) -> f64 {
        let total = self.pool.len();
        if total == 0 {
            return 0.0;
        }
        let wins = self.winning_count(guess);
        let p_win = wins as f64 / total as f64;
        let p_lose = (total - wins) as f64 / total as f64;
        p_win * f64::from(self.payout(guess)) - p_lose * f64::from(self.stage.cost)
    }
}

/// Every guess the game accepts, in tie-break order: directions H, L, T, and
/// for suited games each suit in `Suit::ALL` order with H, L, T inside it.
pub fn candidates(granularity: Granularity) -> Vec<Guess> {
    match granularity {
        Granularity::Direction => Direction::ALL.into_iter().map(Guess::direction).collect(),
        Granularity::DirectionAndSuit => Suit::ALL
            .into_iter()
            .flat_map(|suit| {
                Direction::ALL
                    .into_iter()
                    .map(move |direction| Guess::suited(direction, suit))
            })
            .collect(),
    }
}

/// First candidate holding the maximum score. Later candidates must be strictly
/// greater to displace it, so exact ties keep the earlier entry.
fn first_max<T: PartialOrd + Copy>(
    scored: impl IntoIterator<Item = (Guess, T)>,
) -> Option<Guess> {
    let mut best: Option<(Guess, T)> = None;
    for (guess, score) in scored {
        let better = match best {
            None => true,
            Some((_, top)) => score > top,
        };
        if better {
            best = Some((guess, score));
        }
    }
    best.map(|(guess, _)| guess)
}

pub trait Strategy: Send {
    fn kind(&self) -> StrategyKind;
    fn choose(&mut self, decision: &Decision<'_>) -> Guess;
}

/// Uniform over every accepted guess, blind to the odds.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: RngState,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RngState::from_seed(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Random
    }

    fn choose(&mut self, decision: &Decision<'_>) -> Guess {
        let options = candidates(decision.granularity);
        options[self.rng.index(options.len())]
    }
}

/// Bets the direction with the most cards behind it. In suited games the suit
/// is the first one holding the most cards in that direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueOnlyStrategy;

impl Strategy for ValueOnlyStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ValueOnly
    }

    fn choose(&mut self, decision: &Decision<'_>) -> Guess {
        let counts = decision.pool.direction_counts(decision.reference.rank);
        let direction = first_max(
            Direction::ALL
                .into_iter()
                .map(|d| (Guess::direction(d), counts.get(d))),
        )
        .map(|guess| guess.direction)
        .unwrap_or(Direction::Higher);
        match decision.granularity {
            Granularity::Direction => Guess::direction(direction),
            Granularity::DirectionAndSuit => first_max(Suit::ALL.into_iter().map(|suit| {
                let guess = Guess::suited(direction, suit);
                (guess, decision.winning_count(guess))
            }))
            .unwrap_or(Guess::suited(direction, Suit::Spades)),
        }
    }
}

/// Bets the (suit, direction) pair with the most cards behind it across all
/// twelve combinations. Direction-only games drop the suit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuitAwareStrategy;

impl Strategy for SuitAwareStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SuitAware
    }

    fn choose(&mut self, decision: &Decision<'_>) -> Guess {
        let best = first_max(
            candidates(Granularity::DirectionAndSuit)
                .into_iter()
                .map(|guess| (guess, decision.winning_count(guess))),
        )
        .unwrap_or(Guess::suited(Direction::Higher, Suit::Spades));
        match decision.granularity {
            Granularity::Direction => Guess::direction(best.direction),
            Granularity::DirectionAndSuit => best,
        }
    }
}

/// Maximises analytic EV; equal EVs resolve in candidate order (H, L, T).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpectedValueStrategy;

impl ExpectedValueStrategy {
    pub fn evaluate(decision: &Decision<'_>) -> Vec<(Guess, f64)> {
        candidates(decision.granularity)
            .into_iter()
            .map(|guess| (guess, decision.expected_value(guess)))
            .collect()
    }
}

impl Strategy for ExpectedValueStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ExpectedValue
    }

    fn choose(&mut self, decision: &Decision<'_>) -> Guess {
        first_max(Self::evaluate(decision)).unwrap_or(Guess::direction(Direction::Higher))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Random,
    ValueOnly,
    SuitAware,
    ExpectedValue,
}

impl StrategyKind {
    pub fn from_keyword(value: &str) -> Result<Self, SimError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "value" | "value_only" | "heuristic" => Ok(Self::ValueOnly),
            "suit" | "suit_aware" => Ok(Self::SuitAware),
            "ev" | "optimal" | "expected_value" => Ok(Self::ExpectedValue),
            other => Err(SimError::UnknownStrategy(other.to_string())),
        }
    }

    /// Key under which the strategy appears in reports.
    pub fn report_key(self) -> &'static str {
        match self {
            Self::Random => "random_strategy",
            Self::ValueOnly => "value_only_strategy",
            Self::SuitAware => "suit_aware_strategy",
            Self::ExpectedValue => "optimal_strategy",
        }
    }

    pub fn label(self, granularity: Granularity) -> &'static str {
        match (self, granularity) {
            (Self::Random, Granularity::Direction) => "Random (33% Higher, 33% Lower, 33% Tie)",
            (Self::Random, Granularity::DirectionAndSuit) => {
                "Random (uniform over 12 direction/suit calls)"
            }
            (Self::ValueOnly, _) => "Value-Only Heuristic (most cards behind the call)",
            (Self::SuitAware, _) => "Suit-Aware Heuristic (most cards per suit and direction)",
            (Self::ExpectedValue, _) => "Optimal (Maximize Expected Value per Card)",
        }
    }

    pub fn build(self, seed: u64) -> Box<dyn Strategy> {
        match self {
            Self::Random => Box::new(RandomStrategy::new(seed)),
            Self::ValueOnly => Box::new(ValueOnlyStrategy),
            Self::SuitAware => Box::new(SuitAwareStrategy),
            Self::ExpectedValue => Box::new(ExpectedValueStrategy),
        }
    }
}
