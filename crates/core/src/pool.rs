//! Composition of the cards a guess can still be resolved against.

use crate::{Card, Direction, Rank, Suit};

/// Per-(rank, suit) card counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    counts: [[u8; 4]; 13],
    len: usize,
}

/// How many pool cards resolve each direction against a reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionCounts {
    pub higher: usize,
    pub lower: usize,
    pub tie: usize,
}

impl DirectionCounts {
    pub fn get(&self, direction: Direction) -> usize {
        match direction {
            Direction::Higher => self.higher,
            Direction::Lower => self.lower,
            Direction::Tie => self.tie,
        }
    }

    pub fn total(&self) -> usize {
        self.higher + self.lower + self.tie
    }
}

impl Pool {
    pub fn empty() -> Self {
        Self {
            counts: [[0; 4]; 13],
            len: 0,
        }
    }

    /// One of every card in a standard deck.
    pub fn full() -> Self {
        Self {
            counts: [[1; 4]; 13],
            len: 52,
        }
    }

    pub fn from_cards(cards: &[Card]) -> Self {
        let mut pool = Self::empty();
        for card in cards {
            pool.insert(*card);
        }
        pool
    }

    pub fn insert(&mut self, card: Card) {
        self.counts[card.rank.index()][card.suit.index()] += 1;
        self.len += 1;
    }

    /// Removes one copy of `card`; returns false when it is not present.
    pub fn remove(&mut self, card: Card) -> bool {
        let slot = &mut self.counts[card.rank.index()][card.suit.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        self.len -= 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count(&self, rank: Rank, suit: Suit) -> usize {
        usize::from(self.counts[rank.index()][suit.index()])
    }

    pub fn count_rank(&self, rank: Rank) -> usize {
        self.counts[rank.index()].iter().map(|c| usize::from(*c)).sum()
    }

    /// Counts against `reference` over every suit.
    pub fn direction_counts(&self, reference: Rank) -> DirectionCounts {
        self.tally(reference, |rank| self.count_rank(rank))
    }

    /// Counts against `reference` restricted to cards of `suit`.
    pub fn suit_direction_counts(&self, reference: Rank, suit: Suit) -> DirectionCounts {
        self.tally(reference, |rank| self.count(rank, suit))
    }

    fn tally(&self, reference: Rank, per_rank: impl Fn(Rank) -> usize) -> DirectionCounts {
        let mut counts = DirectionCounts::default();
        for rank in Rank::ALL {
            let n = per_rank(rank);
            match rank.value().cmp(&reference.value()) {
                std::cmp::Ordering::Greater => counts.higher += n,
                std::cmp::Ordering::Less => counts.lower += n,
                std::cmp::Ordering::Equal => counts.tie += n,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_pool_minus_ace_counts() {
        let mut pool = Pool::full();
        assert!(pool.remove(Card::new(Suit::Spades, Rank::Ace)));
        let counts = pool.direction_counts(Rank::Ace);
        assert_eq!(pool.len(), 51);
        assert_eq!(
            counts,
            DirectionCounts {
                higher: 48,
                lower: 0,
                tie: 3
            }
        );
    }

    #[test]
    fn suit_counts_exclude_removed_card() {
        let mut pool = Pool::full();
        pool.remove(Card::new(Suit::Hearts, Rank::Seven));
        let hearts = pool.suit_direction_counts(Rank::Seven, Suit::Hearts);
        let clubs = pool.suit_direction_counts(Rank::Seven, Suit::Clubs);
        assert_eq!((hearts.higher, hearts.lower, hearts.tie), (6, 6, 0));
        assert_eq!((clubs.higher, clubs.lower, clubs.tie), (6, 6, 1));
    }

    #[test]
    fn removing_missing_card_is_rejected() {
        let mut pool = Pool::empty();
        assert!(!pool.remove(Card::new(Suit::Clubs, Rank::Two)));
        assert!(pool.is_empty());
    }
}
