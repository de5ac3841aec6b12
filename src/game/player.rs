use crate::cards::Card;

/// Opaque player identifier. Seating and chip ownership are keyed on
/// this, never on seat index, so a player's identity survives the
/// seat-compaction that follows elimination.
pub type PlayerId = String;

/// A seated player. `seat` is dense (`0..N-1`) and re-packed whenever
/// a player is eliminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub chips: i64,
    pub seat: usize,
    pub hole_cards: Vec<Card>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, chips: i64, seat: usize) -> Self {
        Self {
            id: id.into(),
            chips,
            seat,
            hole_cards: Vec::new(),
        }
    }

    pub fn is_eliminated(&self) -> bool {
        self.chips <= 0 && self.hole_cards.is_empty()
    }
}
