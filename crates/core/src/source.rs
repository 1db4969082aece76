use crate::{Card, Deck, DiceRoll, Pool, RngState};

/// Shuffled draw pile plus dice, both driven by one seeded RNG.
#[derive(Debug, Clone)]
pub struct CardSource {
    rng: RngState,
    deck: Deck,
    reshuffles: u64,
}

impl CardSource {
    pub fn new(seed: u64) -> Self {
        let mut rng = RngState::from_seed(seed);
        let deck = Deck::shuffled(&mut rng);
        Self {
            rng,
            deck,
            reshuffles: 0,
        }
    }

    /// Starts from a fixed deck; later replacements are shuffled from `seed`.
    pub fn with_deck(deck: Deck, seed: u64) -> Self {
        Self {
            rng: RngState::from_seed(seed),
            deck,
            reshuffles: 0,
        }
    }

    /// Replaces the deck when it cannot cover `needed` cards, so a round never
    /// straddles a reshuffle.
    pub fn begin_round(&mut self, needed: usize) {
        if self.deck.len() < needed {
            self.replenish();
        }
    }

    pub fn draw_card(&mut self) -> Card {
        loop {
            if let Some(card) = self.deck.draw() {
                return card;
            }
            self.replenish();
        }
    }

    pub fn roll_dice(&mut self, count: usize) -> Vec<u8> {
        (0..count).map(|_| self.rng.roll_die()).collect()
    }

    pub fn roll_three(&mut self) -> DiceRoll {
        DiceRoll([self.rng.roll_die(), self.rng.roll_die(), self.rng.roll_die()])
    }

    /// Composition of the undealt cards.
    pub fn remaining_pool(&self) -> Pool {
        Pool::from_cards(self.deck.cards())
    }

    pub fn remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn reshuffles(&self) -> u64 {
        self.reshuffles
    }

    fn replenish(&mut self) {
        self.deck = Deck::shuffled(&mut self.rng);
        self.reshuffles += 1;
    }
}
