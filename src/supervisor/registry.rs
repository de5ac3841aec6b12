use crate::game::GameHandle;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Append/remove-only `game_id -> handle` map, guarded by an
/// `RwLock<HashMap<_, _>>` shared across every caller that looks up a
/// running game.
#[derive(Default)]
pub struct Registry {
    games: RwLock<HashMap<String, GameHandle>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, handle: GameHandle) {
        self.games.write().await.insert(handle.game_id.clone(), handle);
    }

    pub async fn get(&self, game_id: &str) -> Option<GameHandle> {
        self.games.read().await.get(game_id).cloned()
    }

    pub async fn remove(&self, game_id: &str) -> Option<GameHandle> {
        self.games.write().await.remove(game_id)
    }

    pub async fn game_ids(&self) -> Vec<String> {
        self.games.read().await.keys().cloned().collect()
    }
}
