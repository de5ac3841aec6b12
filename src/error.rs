use thiserror::Error;

/// Error kinds surfaced by the core: stable reason strings for
/// protocol violations, missing-entity lookups, and input validation.
/// Every fallible core operation returns
/// `Result<_, GameError>`; only the actor/supervisor/event-store
/// boundary widens to `anyhow::Result` for unstructured I/O failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("not your turn")]
    NotYourTurn,

    #[error("invalid action for the current state")]
    InvalidAction,

    #[error("no active betting round")]
    NoActiveBettingRound,

    #[error("insufficient chips")]
    InsufficientChips,

    #[error("raise to {attempted} is below the minimum raise of {minimum}")]
    BelowMinimumRaise { attempted: i64, minimum: i64 },

    #[error("player not found")]
    PlayerNotFound,

    #[error("game not found")]
    GameNotFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to persist event")]
    PersistFailed,
}
