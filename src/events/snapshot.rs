use super::event::{Sequence, TournamentId};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

/// A periodic checkpoint of a tournament's coarse progress, used so an
/// operator doesn't have to replay an arbitrarily long log
/// from event zero just to answer "how far along is this tournament".
/// `recovery::replay` remains the sole authority for reconstructing
/// actual `GameEngine` state — this is an observability aid, not a
/// fast-resume shortcut, since the engine's internal types are pure
/// domain structs rather than wire DTOs and aren't meant to round-trip
/// through serde (see `game::view` for the one place that boundary is
/// crossed deliberately).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tournament_id: TournamentId,
    pub sequence: Sequence,
    pub summary_json: String,
    pub integrity_hash: u64,
}

impl Snapshot {
    pub fn new(tournament_id: TournamentId, sequence: Sequence, summary_json: String) -> Self {
        let integrity_hash = hash_of(&summary_json);
        Self { tournament_id, sequence, summary_json, integrity_hash }
    }

    pub fn is_intact(&self) -> bool {
        hash_of(&self.summary_json) == self.integrity_hash
    }
}

fn hash_of(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save_snapshot(&self, snapshot: Snapshot) -> Result<()>;
    async fn latest_snapshot(&self, tournament_id: &TournamentId) -> Result<Option<Snapshot>>;
}

#[derive(Default)]
pub struct InMemorySnapshotStore {
    latest: Mutex<HashMap<TournamentId, Snapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn save_snapshot(&self, snapshot: Snapshot) -> Result<()> {
        let mut latest = self.latest.lock().map_err(|_| anyhow!("snapshot store lock poisoned"))?;
        latest.insert(snapshot.tournament_id.clone(), snapshot);
        Ok(())
    }

    async fn latest_snapshot(&self, tournament_id: &TournamentId) -> Result<Option<Snapshot>> {
        let latest = self.latest.lock().map_err(|_| anyhow!("snapshot store lock poisoned"))?;
        Ok(latest.get(tournament_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tampered_summary_fails_integrity_check() {
        let mut snapshot = Snapshot::new("t1".to_string(), 5, r#"{"hand_number":3}"#.to_string());
        assert!(snapshot.is_intact());
        snapshot.summary_json.push('x');
        assert!(!snapshot.is_intact());
    }

    #[tokio::test]
    async fn store_keeps_only_the_latest_snapshot_per_tournament() {
        let store = InMemorySnapshotStore::new();
        let tid = "t1".to_string();
        store.save_snapshot(Snapshot::new(tid.clone(), 3, "{}".into())).await.unwrap();
        store.save_snapshot(Snapshot::new(tid.clone(), 9, "{}".into())).await.unwrap();
        let latest = store.latest_snapshot(&tid).await.unwrap().unwrap();
        assert_eq!(latest.sequence, 9);
    }
}
