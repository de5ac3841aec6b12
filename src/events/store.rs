use super::event::{Event, EventPayload, Sequence, TournamentId};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Append-only, per-tournament event persistence. A production store
/// would be backed by a real database driver; this trait is the seam a
/// `GameActor` depends on, a small async trait object standing in
/// front of whatever storage a deployment chooses.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends `payload`, assigning it the next gapless sequence
    /// number for `tournament_id`.
    async fn append(&self, tournament_id: &TournamentId, payload: EventPayload) -> Result<Sequence>;

    /// Every event after (but not including) `after`, in order.
    async fn events_since(&self, tournament_id: &TournamentId, after: Sequence) -> Result<Vec<Event>>;

    /// The full log for one tournament, from sequence 0.
    async fn all_events(&self, tournament_id: &TournamentId) -> Result<Vec<Event>>;

    /// Every tournament with at least one persisted event, for the
    /// recovery scan at startup.
    async fn tournament_ids(&self) -> Result<Vec<TournamentId>>;

    /// True once a `tournament_ended` marker has been appended — a
    /// tournament with events but no marker is the signal recovery
    /// uses to know it was interrupted mid-flight.
    async fn has_terminal_marker(&self, tournament_id: &TournamentId) -> Result<bool>;
}

/// Reference `EventStore` used by tests and the demo binary. Holds
/// every event in memory for the process lifetime; nothing here
/// survives a restart on its own; it exists to exercise the recovery
/// path against a predictable backing store.
#[derive(Default)]
pub struct InMemoryEventStore {
    log: Mutex<HashMap<TournamentId, Vec<Event>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now_millis() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, tournament_id: &TournamentId, payload: EventPayload) -> Result<Sequence> {
        let mut log = self.log.lock().map_err(|_| anyhow!("event log lock poisoned"))?;
        let entries = log.entry(tournament_id.clone()).or_default();
        let sequence = entries.len() as Sequence;
        entries.push(Event {
            tournament_id: tournament_id.clone(),
            sequence,
            payload,
            recorded_at_millis: now_millis(),
        });
        Ok(sequence)
    }

    async fn events_since(&self, tournament_id: &TournamentId, after: Sequence) -> Result<Vec<Event>> {
        let log = self.log.lock().map_err(|_| anyhow!("event log lock poisoned"))?;
        Ok(log
            .get(tournament_id)
            .map(|events| events.iter().filter(|e| e.sequence > after).cloned().collect())
            .unwrap_or_default())
    }

    async fn all_events(&self, tournament_id: &TournamentId) -> Result<Vec<Event>> {
        let log = self.log.lock().map_err(|_| anyhow!("event log lock poisoned"))?;
        let mut events = log.get(tournament_id).cloned().unwrap_or_default();
        events.sort_by_key(|e| e.sequence);
        Ok(events)
    }

    async fn tournament_ids(&self) -> Result<Vec<TournamentId>> {
        let log = self.log.lock().map_err(|_| anyhow!("event log lock poisoned"))?;
        Ok(log.keys().cloned().collect())
    }

    async fn has_terminal_marker(&self, tournament_id: &TournamentId) -> Result<bool> {
        let log = self.log.lock().map_err(|_| anyhow!("event log lock poisoned"))?;
        Ok(log
            .get(tournament_id)
            .is_some_and(|events| events.iter().any(|e| matches!(e.payload, EventPayload::TournamentEnded { .. }))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequence_numbers_are_gapless_and_ordered() {
        let store = InMemoryEventStore::new();
        let tid = "t1".to_string();
        let s0 = store.append(&tid, EventPayload::TournamentEnded { winner: "a".into() }).await.unwrap();
        let s1 = store.append(&tid, EventPayload::TournamentEnded { winner: "a".into() }).await.unwrap();
        assert_eq!(s0, 0);
        assert_eq!(s1, 1);
        let all = store.all_events(&tid).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].sequence, 0);
        assert_eq!(all[1].sequence, 1);
    }

    #[tokio::test]
    async fn has_terminal_marker_tracks_the_ended_event() {
        let store = InMemoryEventStore::new();
        let tid = "t2".to_string();
        store.append(&tid, EventPayload::PlayerFolded { player_id: "a".into(), pot: 30 }).await.unwrap();
        assert!(!store.has_terminal_marker(&tid).await.unwrap());
        store.append(&tid, EventPayload::TournamentEnded { winner: "b".into() }).await.unwrap();
        assert!(store.has_terminal_marker(&tid).await.unwrap());
    }

    #[tokio::test]
    async fn events_since_excludes_the_given_sequence() {
        let store = InMemoryEventStore::new();
        let tid = "t3".to_string();
        store.append(&tid, EventPayload::PlayerChecked { player_id: "a".into(), pot: 0 }).await.unwrap();
        store.append(&tid, EventPayload::PlayerChecked { player_id: "b".into(), pot: 0 }).await.unwrap();
        let since = store.events_since(&tid, 0).await.unwrap();
        assert_eq!(since.len(), 1);
        assert_eq!(since[0].sequence, 1);
    }
}
