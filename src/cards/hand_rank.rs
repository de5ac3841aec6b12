use std::fmt::{Display, Formatter, Result};

/// Short-deck hand categories, ordered ascending (`HighCard` weakest).
/// Flush outranks full house here because the missing low cards make
/// flushes rarer than full houses in a 36-card deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    FullHouse = 5,
    Flush = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Display for HandCategory {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{}",
            match self {
                HandCategory::HighCard => "high card",
                HandCategory::OnePair => "one pair",
                HandCategory::TwoPair => "two pair",
                HandCategory::ThreeOfAKind => "three of a kind",
                HandCategory::Straight => "straight",
                HandCategory::FullHouse => "full house",
                HandCategory::Flush => "flush",
                HandCategory::FourOfAKind => "four of a kind",
                HandCategory::StraightFlush => "straight flush",
            }
        )
    }
}

/// A scored 5-card-or-fewer hand: category plus a tie-break key whose
/// lexicographic order matches the category's own tie-break rule
/// (e.g. pair rank then kickers, descending). Deriving `Ord` on the
/// `(category, key)` pair compares category first, then the
/// category-specific key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandValue {
    pub category: HandCategory,
    pub key: Vec<u8>,
}

impl Display for HandValue {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.category)
    }
}
