pub mod queue;
pub mod token;

pub use queue::{Command, GameCreator, GameReady, Queue, QueueError, Waiter};
pub use token::{Claims, SessionTokens};
