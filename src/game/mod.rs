pub mod actor;
pub mod engine;
pub mod handle;
pub mod player;
pub mod state;
pub mod view;

pub use actor::{Command, GameActor, Response};
pub use engine::{GameEngine, HandStartedOutcome, RoundResolution, ServerPhase};
pub use handle::GameHandle;
pub use player::{Player, PlayerId};
pub use state::{GamePhase, GameState, ShowdownAward};
pub use view::{LegalActionView, PlayerPublicView, Snapshot};
