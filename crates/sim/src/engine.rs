//! Staged high-low rounds.
//!
//! A round walks `StageDrawn -> StageWon -> (advance) StageDrawn -> ... -> Settled`.
//! Each resolved stage charges its cost. A miss at any stage settles the round
//! with no payout, so every cost paid so far is lost. A hit either ends the
//! round (last stage or cash-out) with the sum of the stage payouts, or rides
//! into the next stage with the revealed card as the new reference.

use crate::{Decision, EngineConfig, PoolTracking, SimError, Strategy};
use serde::{Deserialize, Serialize};
use wagerlab_core::{
    classify_cards, Card, CardSource, Direction, GameRules, Granularity, Guess, Pool, RngState,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageResult {
    pub stage: usize,
    pub reference: Card,
    pub drawn: Card,
    pub guess: Guess,
    pub outcome: Direction,
    pub cost: u32,
    /// Amount the stage would have paid; zero on a miss.
    pub payout: u32,
    pub won: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundOutcome {
    pub cards_drawn: Vec<Card>,
    pub stages: Vec<StageResult>,
    pub total_wagered: u32,
    pub total_payout: u32,
    pub net_result: i64,
    pub won: bool,
}

impl RoundOutcome {
    /// Reference card of the first stage.
    pub fn first_card(&self) -> Option<Card> {
        self.cards_drawn.first().copied()
    }

    pub fn first_guess(&self) -> Option<Guess> {
        self.stages.first().map(|stage| stage.guess)
    }

    pub fn stages_played(&self) -> usize {
        self.stages.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Reference revealed, waiting for a guess.
    StageDrawn,
    /// Current stage hit and another stage exists: continue or cash out.
    StageWon,
    Settled,
}

#[derive(Debug, Clone)]
pub struct Round<'r> {
    rules: &'r GameRules,
    stage: usize,
    reference: Card,
    pool: Pool,
    cards: Vec<Card>,
    results: Vec<StageResult>,
    wagered: u32,
    banked: u32,
    phase: RoundPhase,
}

impl<'r> Round<'r> {
    /// Draws the first reference. The source is topped up first so the whole
    /// round comes out of one deck.
    pub fn deal(rules: &'r GameRules, source: &mut CardSource, tracking: PoolTracking) -> Self {
        source.begin_round(rules.cards_per_round());
        let reference = source.draw_card();
        let pool = match tracking {
            PoolTracking::Round => {
                let mut pool = Pool::full();
                pool.remove(reference);
                pool
            }
            PoolTracking::Deck => source.remaining_pool(),
        };
        let mut cards = Vec::with_capacity(rules.cards_per_round());
        cards.push(reference);
        Self {
            rules,
            stage: 0,
            reference,
            pool,
            cards,
            results: Vec::with_capacity(rules.stage_count()),
            wagered: 0,
            banked: 0,
            phase: RoundPhase::StageDrawn,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn reference(&self) -> Card {
        self.reference
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn wagered(&self) -> u32 {
        self.wagered
    }

    /// Payout collected so far if the round were cashed out now.
    pub fn banked(&self) -> u32 {
        self.banked
    }

    pub fn decision(&self) -> Decision<'_> {
        Decision {
            reference: self.reference,
            pool: &self.pool,
            stage: &self.rules.stages[self.stage],
            granularity: self.rules.granularity,
        }
    }

    /// Reveals the next card against `guess` and charges the stage cost.
    pub fn resolve(
        &mut self,
        guess: Guess,
        source: &mut CardSource,
    ) -> Result<StageResult, SimError> {
        if self.phase != RoundPhase::StageDrawn {
            return Err(SimError::InvalidStep(format!(
                "resolve called in {:?}",
                self.phase
            )));
        }
        let guess = normalize_guess(guess, self.rules.granularity)?;
        let rules = self.rules.stages[self.stage];
        let drawn = source.draw_card();
        self.pool.remove(drawn);
        self.cards.push(drawn);
        self.wagered += rules.cost;

        let won = guess.wins(self.reference, drawn);
        let payout = if won {
            rules.payouts.payout(self.reference.rank, guess.direction)
        } else {
            0
        };
        let result = StageResult {
            stage: self.stage,
            reference: self.reference,
            drawn,
            guess,
            outcome: classify_cards(self.reference, drawn),
            cost: rules.cost,
            payout,
            won,
        };
        self.results.push(result);

        if won {
            self.banked += payout;
            self.phase = if self.stage + 1 < self.rules.stage_count() {
                RoundPhase::StageWon
            } else {
                RoundPhase::Settled
            };
        } else {
            self.banked = 0;
            self.phase = RoundPhase::Settled;
        }
        Ok(result)
    }

    /// Rides the win into the next stage; the card just revealed becomes the reference.
    pub fn advance(&mut self) -> Result<Card, SimError> {
        if self.phase != RoundPhase::StageWon {
            return Err(SimError::InvalidStep(format!(
                "advance called in {:?}",
                self.phase
            )));
        }
        let Some(last) = self.results.last() else {
            return Err(SimError::InvalidStep("no stage resolved".to_string()));
        };
        self.reference = last.drawn;
        self.stage += 1;
        self.phase = RoundPhase::StageDrawn;
        Ok(self.reference)
    }

    /// Closes the round. Outstanding wins are cashed out.
    pub fn settle(self) -> Result<RoundOutcome, SimError> {
        if self.results.is_empty() {
            return Err(SimError::InvalidStep(
                "settle called before any stage resolved".to_string(),
            ));
        }
        let net_result = i64::from(self.banked) - i64::from(self.wagered);
        Ok(RoundOutcome {
            cards_drawn: self.cards,
            stages: self.results,
            total_wagered: self.wagered,
            total_payout: self.banked,
            net_result,
            won: self.banked > 0,
        })
    }
}

fn normalize_guess(guess: Guess, granularity: Granularity) -> Result<Guess, SimError> {
    match granularity {
        Granularity::Direction => Ok(Guess::direction(guess.direction)),
        Granularity::DirectionAndSuit => match guess.suit {
            Some(_) => Ok(guess),
            None => Err(SimError::InvalidGuess(format!(
                "{} needs a suit",
                guess.direction.name()
            ))),
        },
    }
}

/// Plays whole rounds with a policy and a continuation coin.
#[derive(Debug, Clone)]
pub struct RoundEngine {
    rules: GameRules,
    config: EngineConfig,
    coin: RngState,
}

impl RoundEngine {
    pub fn new(rules: GameRules, config: EngineConfig) -> Result<Self, SimError> {
        rules.validate()?;
        config.validate()?;
        Ok(Self {
            coin: RngState::from_seed(config.seed),
            rules,
            config,
        })
    }

    pub fn play(
        &mut self,
        source: &mut CardSource,
        strategy: &mut dyn Strategy,
    ) -> Result<RoundOutcome, SimError> {
        let mut round = Round::deal(&self.rules, source, self.config.pool_tracking);
        loop {
            let guess = strategy.choose(&round.decision());
            round.resolve(guess, source)?;
            if round.phase() != RoundPhase::StageWon {
                break;
            }
            if !self.coin.chance(self.config.continue_probability) {
                break;
            }
            round.advance()?;
        }
        round.settle()
    }
}
