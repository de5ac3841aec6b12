pub mod action;
pub mod pots;
pub mod round;

pub use action::{Action, LegalAction};
pub use pots::SidePot;
pub use round::{BettingRound, RoundSeat};
