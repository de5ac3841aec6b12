pub mod event;
pub mod recovery;
pub mod snapshot;
pub mod store;

pub use event::{Event, EventPayload, Sequence, ShowdownAwardRecord, TournamentId};
pub use recovery::replay;
pub use snapshot::{InMemorySnapshotStore, Snapshot, SnapshotStore};
pub use store::{EventStore, InMemoryEventStore};
