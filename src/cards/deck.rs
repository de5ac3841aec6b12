use super::card::Card;
use super::rank::Rank;
use super::suit::Suit;
use crate::error::GameError;
use rand::seq::SliceRandom;

/// The 36-card short deck: ranks Six through Ace, all four suits.
/// Cards are drawn from the back of an internal `Vec`, so the deck is
/// consumed front-to-back only through shuffling, never by index.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A freshly shuffled 36-card deck.
    pub fn new() -> Self {
        let mut deck = Self::ordered();
        deck.shuffle();
        deck
    }

    /// All 36 cards in a fixed, unshuffled order. Exposed mainly for tests.
    pub fn ordered() -> Self {
        let cards = Rank::ALL
            .iter()
            .flat_map(|&rank| Suit::ALL.iter().map(move |&suit| Card::new(rank, suit)))
            .collect();
        Self { cards }
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Removes and returns the top card.
    pub fn deal_card(&mut self) -> Result<Card, GameError> {
        self.cards
            .pop()
            .ok_or_else(|| GameError::InvalidInput("deck is empty".into()))
    }

    /// Removes and returns `count` cards. Fails atomically (no partial
    /// draw) when the deck doesn't hold enough cards.
    pub fn deal_n(&mut self, count: usize) -> Result<Vec<Card>, GameError> {
        if count > self.cards.len() {
            return Err(GameError::InvalidInput(format!(
                "cannot deal {count} cards from a deck of {}",
                self.cards.len()
            )));
        }
        Ok((0..count)
            .map(|_| self.cards.pop().expect("length checked above"))
            .collect())
    }

    /// Burns one card and returns the next `n` after it, the standard
    /// protocol for dealing the flop/turn/river.
    pub fn burn_and_deal(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        self.deal_card()?;
        self.deal_n(n)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deck_has_36_cards() {
        assert_eq!(Deck::new().len(), 36);
    }

    #[test]
    fn deal_card_shrinks_deck() {
        let mut deck = Deck::new();
        deck.deal_card().unwrap();
        assert_eq!(deck.len(), 35);
    }

    #[test]
    fn deal_n_fails_when_not_enough_cards() {
        let mut deck = Deck::new();
        assert!(deck.deal_n(40).is_err());
        assert_eq!(deck.len(), 36, "failed deal must not consume cards");
    }

    #[test]
    fn burn_and_deal_removes_burn_plus_n() {
        let mut deck = Deck::new();
        let dealt = deck.burn_and_deal(3).unwrap();
        assert_eq!(dealt.len(), 3);
        assert_eq!(deck.len(), 32);
    }
}
