use super::rank::Rank;
use super::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// A single card from the 36-card short deck. Dense `u8` encoding
/// (`rank * 4 + suit`, 0..36) so a `Card` fits in a register and a
/// full deck fits in a `u64` bitmask if ever needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }
}

impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.rank.value() * 4 + c.suit as u8
    }
}

impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4),
            suit: Suit::from(n % 4),
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_u8() {
        for n in 0..36u8 {
            let card = Card::from(n);
            assert_eq!(u8::from(card), n);
        }
    }

    #[test]
    fn displays_rank_then_suit() {
        let card = Card::new(Rank::Ace, Suit::Spades);
        assert_eq!(card.to_string(), "A♠");
    }
}
