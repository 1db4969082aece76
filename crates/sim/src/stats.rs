//! Raw per-batch totals. Ratios are derived once from the final sums, never
//! accumulated, so shards can be merged in any order without drift.

use crate::{DiceOutcome, RoundOutcome};
use serde::{Deserialize, Serialize};
use wagerlab_core::{Direction, Guess, Rank, Statement};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tally {
    pub plays: u64,
    pub wins: u64,
    pub losses: u64,
    pub net: i64,
}

impl Tally {
    pub fn record(&mut self, won: bool, net: i64) {
        self.plays += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.net += net;
    }

    pub fn merge(&mut self, other: &Tally) {
        self.plays += other.plays;
        self.wins += other.wins;
        self.losses += other.losses;
        self.net += other.net;
    }

    /// `None` when nothing landed in this bucket.
    pub fn win_rate(&self) -> Option<f64> {
        ratio(self.wins, self.plays)
    }
}

pub fn ratio(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Totals {
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub wagered: u64,
    pub payout: u64,
    pub net: i64,
    /// Exact sum of squared net results, for the standard deviation.
    pub net_squares: i128,
}

impl Totals {
    pub fn record(&mut self, won: bool, wagered: u32, payout: u32, net: i64) {
        self.rounds += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.wagered += u64::from(wagered);
        self.payout += u64::from(payout);
        self.net += net;
        self.net_squares += i128::from(net) * i128::from(net);
    }

    pub fn merge(&mut self, other: &Totals) {
        self.rounds += other.rounds;
        self.wins += other.wins;
        self.losses += other.losses;
        self.wagered += other.wagered;
        self.payout += other.payout;
        self.net += other.net;
        self.net_squares += other.net_squares;
    }

    /// `None` for an empty batch.
    pub fn derive(&self, entry_cost: u32) -> Option<Derived> {
        if self.rounds == 0 {
            return None;
        }
        let n = self.rounds as f64;
        let player_win_rate = self.wins as f64 / n;
        let house_win_rate = 1.0 - player_win_rate;
        let ev = self.net as f64 / n;
        let variance = (self.net_squares as f64 / n - ev * ev).max(0.0);
        let roi = if entry_cost == 0 {
            None
        } else {
            Some(ev / f64::from(entry_cost) * 100.0)
        };
        Some(Derived {
            player_win_rate,
            house_win_rate,
            house_advantage: (house_win_rate - player_win_rate) * 100.0,
            expected_value: ev,
            roi,
            net_std_dev: variance.sqrt(),
            house_edge_on_wagered: ratio(self.payout, self.wagered).map(|r| (1.0 - r) * 100.0),
        })
    }
}

/// Ratios derived from final totals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Derived {
    pub player_win_rate: f64,
    pub house_win_rate: f64,
    /// `(house_win_rate - player_win_rate) * 100`.
    pub house_advantage: f64,
    /// Mean net result per round.
    pub expected_value: f64,
    /// Expected value as a percentage of the entry cost.
    pub roi: Option<f64>,
    pub net_std_dev: f64,
    /// Share of every unit wagered the house keeps, in percent.
    pub house_edge_on_wagered: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardStats {
    pub totals: Totals,
    /// Keyed by the first reference card.
    pub by_first_card: [Tally; 13],
    /// Last first-stage call made at each reference rank.
    pub choice_at_rank: [Option<Guess>; 13],
    /// Keyed by the first-stage call's direction.
    pub by_choice: [Tally; 3],
    /// Index `i` holds rounds that resolved `i + 1` stages.
    pub by_stages_played: Vec<Tally>,
}

impl CardStats {
    pub fn record(&mut self, outcome: &RoundOutcome) {
        let net = outcome.net_result;
        self.totals.record(
            outcome.won,
            outcome.total_wagered,
            outcome.total_payout,
            net,
        );
        if let Some(card) = outcome.first_card() {
            self.by_first_card[card.rank.index()].record(outcome.won, net);
            if let Some(guess) = outcome.first_guess() {
                self.choice_at_rank[card.rank.index()] = Some(guess);
            }
        }
        if let Some(guess) = outcome.first_guess() {
            self.by_choice[guess.direction.index()].record(outcome.won, net);
        }
        let depth = outcome.stages_played();
        if depth > 0 {
            if self.by_stages_played.len() < depth {
                self.by_stages_played.resize(depth, Tally::default());
            }
            self.by_stages_played[depth - 1].record(outcome.won, net);
        }
    }

    /// Folds `other` in as if its rounds had been recorded after ours.
    pub fn merge(&mut self, other: &CardStats) {
        self.totals.merge(&other.totals);
        for (mine, theirs) in self.by_first_card.iter_mut().zip(&other.by_first_card) {
            mine.merge(theirs);
        }
        for (mine, theirs) in self.choice_at_rank.iter_mut().zip(&other.choice_at_rank) {
            if theirs.is_some() {
                *mine = *theirs;
            }
        }
        for (mine, theirs) in self.by_choice.iter_mut().zip(&other.by_choice) {
            mine.merge(theirs);
        }
        if self.by_stages_played.len() < other.by_stages_played.len() {
            self.by_stages_played
                .resize(other.by_stages_played.len(), Tally::default());
        }
        for (mine, theirs) in self.by_stages_played.iter_mut().zip(&other.by_stages_played) {
            mine.merge(theirs);
        }
    }

    pub fn first_card(&self, rank: Rank) -> &Tally {
        &self.by_first_card[rank.index()]
    }

    pub fn choice(&self, direction: Direction) -> &Tally {
        &self.by_choice[direction.index()]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiceStats {
    pub totals: Totals,
    /// Keyed by the roll's false statement.
    pub by_false_statement: [Tally; 3],
    /// Keyed by the statement the player named.
    pub by_guess: [Tally; 3],
}

impl DiceStats {
    pub fn record(&mut self, outcome: &DiceOutcome) {
        self.totals.record(
            outcome.won,
            outcome.wagered,
            outcome.payout,
            outcome.net_result,
        );
        self.by_false_statement[outcome.false_statement.index()]
            .record(outcome.won, outcome.net_result);
        self.by_guess[outcome.guess.index()].record(outcome.won, outcome.net_result);
    }

    pub fn merge(&mut self, other: &DiceStats) {
        self.totals.merge(&other.totals);
        for (mine, theirs) in self
            .by_false_statement
            .iter_mut()
            .zip(&other.by_false_statement)
        {
            mine.merge(theirs);
        }
        for (mine, theirs) in self.by_guess.iter_mut().zip(&other.by_guess) {
            mine.merge(theirs);
        }
    }

    pub fn false_statement(&self, statement: Statement) -> &Tally {
        &self.by_false_statement[statement.index()]
    }
}
