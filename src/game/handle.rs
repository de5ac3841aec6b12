use super::actor::{Command, GameActor, GameId};
use super::player::{Player, PlayerId};
use super::view::Snapshot;
use crate::betting::Action;
use crate::error::GameError;
use crate::events::EventStore;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

/// Caller-facing wrapper around a running [`GameActor`]'s command
/// sender: everything outside the actor's own loop talks to the game
/// through this, never through the engine directly.
#[derive(Clone)]
pub struct GameHandle {
    pub game_id: GameId,
    sender: UnboundedSender<Command>,
}

impl GameHandle {
    pub fn spawn(game_id: GameId, players: Vec<Player>, small_blind: i64, big_blind: i64, event_store: Arc<dyn EventStore>) -> Self {
        let sender = GameActor::spawn(game_id.clone(), players, small_blind, big_blind, event_store);
        Self { game_id, sender }
    }

    pub fn from_sender(game_id: GameId, sender: UnboundedSender<Command>) -> Self {
        Self { game_id, sender }
    }

    pub async fn start_hand(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.sender.send(Command::StartHand { reply }).map_err(|_| anyhow!("game {} actor has shut down", self.game_id))?;
        rx.await.map_err(|_| anyhow!("game {} actor dropped the reply channel", self.game_id))?.map_err(Into::into)
    }

    pub async fn player_action(&self, player_id: PlayerId, action: Action) -> Result<(), GameError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(Command::PlayerAction { player_id, action, reply })
            .map_err(|_| GameError::GameNotFound)?;
        rx.await.map_err(|_| GameError::GameNotFound)?
    }

    /// Subscribes `player_id` to this game's filtered snapshot stream,
    /// returning the receiver end for the caller to drain.
    pub fn subscribe(&self, player_id: PlayerId) -> Result<UnboundedReceiver<Snapshot>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.sender
            .send(Command::Subscribe { player_id, sender })
            .map_err(|_| anyhow!("game {} actor has shut down", self.game_id))?;
        Ok(receiver)
    }
}
