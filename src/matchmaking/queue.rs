use super::token::SessionTokens;
use crate::game::player::{Player, PlayerId};
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("{0} is already queued")]
    AlreadyQueued(PlayerId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Waiter {
    pub name: PlayerId,
    pub joined_at_millis: i64,
}

/// Published on `player:{player_name}` once a waiter is seated.
#[derive(Debug, Clone)]
pub struct GameReady {
    pub player_id: PlayerId,
    pub game_id: String,
    pub session_token: String,
}

/// What the queue asks for once it has peeled a full group of
/// waiters. Implemented by the supervisor so the queue never reaches
/// into a `GameHandle` itself — queue and supervisor stay separate
/// actors.
#[async_trait]
pub trait GameCreator: Send + Sync {
    async fn create_game(&self, players: Vec<Player>) -> anyhow::Result<String>;
}

pub enum Command {
    Join { name: PlayerId, reply: oneshot::Sender<Result<(), QueueError>> },
    Leave { name: PlayerId, reply: oneshot::Sender<()> },
    Status { reply: oneshot::Sender<Vec<Waiter>> },
}

/// Single global actor holding the ordered waiter list. Like
/// `GameActor`, reachable only through its command inbox — no shared,
/// lockable waiter list exists anywhere else.
pub struct Queue {
    waiters: Vec<Waiter>,
    players_per_game: usize,
    starting_chips: i64,
    creator: Arc<dyn GameCreator>,
    tokens: Arc<SessionTokens>,
    ready: UnboundedSender<GameReady>,
    inbox: UnboundedReceiver<Command>,
}

impl Queue {
    pub fn spawn(
        players_per_game: usize,
        starting_chips: i64,
        creator: Arc<dyn GameCreator>,
        tokens: Arc<SessionTokens>,
    ) -> (UnboundedSender<Command>, UnboundedReceiver<GameReady>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();
        let queue = Self {
            waiters: Vec::new(),
            players_per_game,
            starting_chips,
            creator,
            tokens,
            ready: ready_tx,
            inbox: rx,
        };
        tokio::spawn(queue.run());
        (tx, ready_rx)
    }

    async fn run(mut self) {
        while let Some(command) = self.inbox.recv().await {
            match command {
                Command::Join { name, reply } => {
                    let result = self.join(name).await;
                    let _ = reply.send(result);
                }
                Command::Leave { name, reply } => {
                    self.waiters.retain(|w| w.name != name);
                    let _ = reply.send(());
                }
                Command::Status { reply } => {
                    let _ = reply.send(self.waiters.clone());
                }
            }
        }
    }

    async fn join(&mut self, name: PlayerId) -> Result<(), QueueError> {
        if self.waiters.iter().any(|w| w.name == name) {
            return Err(QueueError::AlreadyQueued(name));
        }
        self.waiters.push(Waiter { name, joined_at_millis: now_millis() });
        if self.waiters.len() >= self.players_per_game {
            self.peel_and_seat().await;
        }
        Ok(())
    }

    async fn peel_and_seat(&mut self) {
        let group: Vec<Waiter> = self.waiters.drain(..self.players_per_game).collect();
        let players: Vec<Player> = group
            .iter()
            .enumerate()
            .map(|(seat, waiter)| Player::new(waiter.name.clone(), self.starting_chips, seat))
            .collect();

        match self.creator.create_game(players).await {
            Ok(game_id) => {
                info!("queue: seated {} players into game {game_id}", group.len());
                for waiter in &group {
                    match self.tokens.issue(&game_id, &waiter.name) {
                        Ok(session_token) => {
                            let ready = GameReady { player_id: waiter.name.clone(), game_id: game_id.clone(), session_token };
                            if self.ready.send(ready).is_err() {
                                warn!("queue: game_ready receiver dropped, {} will not be notified", waiter.name);
                            }
                        }
                        Err(e) => warn!("queue: failed to sign session token for {}: {e}", waiter.name),
                    }
                }
            }
            Err(e) => {
                warn!("queue: game creation failed, returning {} waiters to the front: {e}", group.len());
                let mut requeued = group;
                requeued.append(&mut self.waiters);
                self.waiters = requeued;
            }
        }
    }
}

fn now_millis() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}
