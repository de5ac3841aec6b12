use crate::cards::{Card, Street};
use crate::game::player::PlayerId;
use crate::game::state::ShowdownAward;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type TournamentId = String;

/// A gapless, 0-indexed position within one tournament's event log.
/// Recovery trusts contiguity: a gap means corruption, not a
/// missing-but-harmless event.
pub type Sequence = u64;

/// One fact the core emitted, tagged so recovery can dispatch on it
/// without a separate `EventType` field to keep in sync. Includes
/// `community_dealt` and `hand_completed` so a pure reducer can
/// rebuild a hand exactly rather than only through its first street.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    TournamentCreated {
        players: Vec<(PlayerId, usize, i64)>,
        small_blind: i64,
        big_blind: i64,
    },
    HandStarted {
        hand_number: u64,
        button_seat: usize,
        players: Vec<(PlayerId, usize, i64)>,
        hole_cards: HashMap<PlayerId, Vec<Card>>,
    },
    CommunityDealt {
        street: String,
        cards: Vec<Card>,
    },
    PlayerFolded {
        player_id: PlayerId,
        pot: i64,
    },
    PlayerCalled {
        player_id: PlayerId,
        amount: i64,
        pot: i64,
    },
    PlayerChecked {
        player_id: PlayerId,
        pot: i64,
    },
    PlayerRaised {
        player_id: PlayerId,
        total: i64,
        pot: i64,
    },
    PlayerAllIn {
        player_id: PlayerId,
        total: i64,
        pot: i64,
    },
    HandCompleted {
        awards: Vec<ShowdownAwardRecord>,
    },
    TournamentEnded {
        winner: PlayerId,
    },
}

/// `ShowdownAward` flattened into serde-friendly fields; kept separate
/// from the domain type the same way `game::view` keeps wire DTOs
/// separate from domain structs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowdownAwardRecord {
    pub pot_amount: i64,
    pub winners: Vec<PlayerId>,
    pub amount_per_winner: i64,
    pub odd_chip_winner: Option<PlayerId>,
    pub hand_description: String,
}

impl From<&ShowdownAward> for ShowdownAwardRecord {
    fn from(award: &ShowdownAward) -> Self {
        Self {
            pot_amount: award.pot_amount,
            winners: award.winners.clone(),
            amount_per_winner: award.amount_per_winner,
            odd_chip_winner: award.odd_chip_winner.clone(),
            hand_description: award.hand_description.clone(),
        }
    }
}

impl EventPayload {
    pub fn community_dealt(street: Street, cards: Vec<Card>) -> Self {
        EventPayload::CommunityDealt { street: street.to_string(), cards }
    }
}

/// One persisted, sequenced record in a tournament's append-only log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub tournament_id: TournamentId,
    pub sequence: Sequence,
    pub payload: EventPayload,
    pub recorded_at_millis: i64,
}
