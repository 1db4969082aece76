use crate::{Card, ConfigError, Rank, RngState, Suit};

pub const DECK_SIZE: usize = 52;

/// Draw pile consumed from the back.
#[derive(Debug, Default, Clone)]
pub struct Deck {
    draw: Vec<Card>,
}

impl Deck {
    pub fn standard52() -> Self {
        let mut draw = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                draw.push(Card::new(suit, rank));
            }
        }
        Self { draw }
    }

    pub fn shuffled(rng: &mut RngState) -> Self {
        let mut deck = Self::standard52();
        deck.shuffle(rng);
        deck
    }

    /// Builds a deck in the given order; the last card is drawn first.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, ConfigError> {
        if cards.len() != DECK_SIZE {
            return Err(ConfigError::MalformedDeck(format!(
                "expected {DECK_SIZE} cards, got {}",
                cards.len()
            )));
        }
        let mut seen = [[false; 4]; 13];
        for card in &cards {
            let slot = &mut seen[card.rank.index()][card.suit.index()];
            if *slot {
                return Err(ConfigError::MalformedDeck(format!("duplicate card {card}")));
            }
            *slot = true;
        }
        Ok(Self { draw: cards })
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.draw);
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.draw.pop()
    }

    pub fn len(&self) -> usize {
        self.draw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.draw
    }
}
