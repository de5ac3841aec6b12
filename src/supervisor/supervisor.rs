use super::registry::Registry;
use crate::events::{recovery, EventStore};
use crate::game::{GameActor, GameHandle, Player};
use crate::matchmaking::GameCreator;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One-for-one supervisor: starts new games, restarts crashed ones by
/// replaying their event log, terminates on request.
pub struct Supervisor {
    registry: Registry,
    event_store: Arc<dyn EventStore>,
    small_blind: i64,
    big_blind: i64,
    next_id: AtomicU64,
}

impl Supervisor {
    pub fn new(event_store: Arc<dyn EventStore>, small_blind: i64, big_blind: i64) -> Self {
        Self {
            registry: Registry::new(),
            event_store,
            small_blind,
            big_blind,
            next_id: AtomicU64::new(1),
        }
    }

    pub async fn start_game(&self, players: Vec<Player>) -> Result<String> {
        let game_id = format!("game-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let handle = GameHandle::spawn(game_id.clone(), players, self.small_blind, self.big_blind, self.event_store.clone());
        self.registry.insert(handle).await;
        info!("supervisor: started game {game_id}");
        Ok(game_id)
    }

    pub async fn get_game(&self, game_id: &str) -> Result<GameHandle> {
        self.registry.get(game_id).await.ok_or_else(|| anyhow!("game {game_id} not found"))
    }

    pub async fn terminate(&self, game_id: &str) -> Result<()> {
        self.registry
            .remove(game_id)
            .await
            .map(|_| info!("supervisor: terminated game {game_id}"))
            .ok_or_else(|| anyhow!("game {game_id} not found"))
    }

    pub async fn game_ids(&self) -> Vec<String> {
        self.registry.game_ids().await
    }

    /// Boot-time recovery scan: every tournament with events but no
    /// `tournament_ended` marker is replayed through the pure reducer
    /// and restarted as a fresh actor seeded with that state.
    pub async fn recover_all(&self) -> Result<usize> {
        let mut restarted = 0;
        for tournament_id in self.event_store.tournament_ids().await? {
            if self.event_store.has_terminal_marker(&tournament_id).await? {
                continue;
            }
            let events = self.event_store.all_events(&tournament_id).await?;
            match recovery::replay(&events) {
                Ok(engine) => {
                    let sender = GameActor::spawn_recovered(tournament_id.clone(), engine, self.event_store.clone());
                    self.registry.insert(GameHandle::from_sender(tournament_id.clone(), sender)).await;
                    restarted += 1;
                    info!("supervisor: recovered game {tournament_id}");
                }
                Err(e) => warn!("supervisor: failed to recover game {tournament_id}: {e}"),
            }
        }
        Ok(restarted)
    }
}

#[async_trait]
impl GameCreator for Supervisor {
    async fn create_game(&self, players: Vec<Player>) -> Result<String> {
        self.start_game(players).await
    }
}
