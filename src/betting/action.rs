use std::fmt::{Display, Formatter, Result};

/// The action tuple shape consumed by the core. `Raise`'s amount is
/// the *total* the player will have committed this round after the
/// raise, not an increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fold,
    Call,
    Check,
    Raise(i64),
    AllIn,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Action::Fold => write!(f, "fold"),
            Action::Call => write!(f, "call"),
            Action::Check => write!(f, "check"),
            Action::Raise(to) => write!(f, "raise to {to}"),
            Action::AllIn => write!(f, "all-in"),
        }
    }
}

/// The kind of a legal action, without payload — what a snapshot
/// broadcast sends a recipient as their menu of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegalAction {
    Fold,
    Call,
    Check,
    Raise,
    AllIn,
}

impl Display for LegalAction {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            LegalAction::Fold => write!(f, "fold"),
            LegalAction::Call => write!(f, "call"),
            LegalAction::Check => write!(f, "check"),
            LegalAction::Raise => write!(f, "raise"),
            LegalAction::AllIn => write!(f, "all_in"),
        }
    }
}
