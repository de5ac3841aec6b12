use super::player::PlayerId;
use super::state::{GamePhase, GameState, ShowdownAward};
use crate::betting::{BettingRound, LegalAction};
use serde::Serialize;
use std::collections::HashSet;

/// One recipient's view of a seated opponent (or themselves). Hole
/// cards are empty unless the recipient is this player, or this is a
/// true showdown. Cards and enums cross the wire as their `Display`
/// string, the same convention the DTO layer uses for every other
/// domain value.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerPublicView {
    pub id: PlayerId,
    pub chips: i64,
    pub seat: usize,
    pub visible_cards: Vec<String>,
    pub is_current_turn: bool,
    pub folded: bool,
    pub all_in: bool,
}

/// A legal action offered to the recipient, with the extra payload a
/// transport needs to render a raise slider.
#[derive(Debug, Clone, Serialize)]
pub struct LegalActionView {
    pub action: String,
    pub minimum_raise: Option<i64>,
}

/// One side pot's resolved winners, shaped for display.
#[derive(Debug, Clone, Serialize)]
pub struct ShowdownAwardView {
    pub pot_amount: i64,
    pub winners: Vec<PlayerId>,
    pub amount_per_winner: i64,
    pub odd_chip_winner: Option<PlayerId>,
    pub hand_description: String,
}

impl From<&ShowdownAward> for ShowdownAwardView {
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

/// The filtered, per-player snapshot published on `game:{id}:{player}`.
/// One of these is built per recipient for every broadcast — never a
/// single shared "omniscient" view — which is what keeps hole cards
/// from leaking.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub game_id: String,
    pub server_phase: String,
    pub game_phase: String,
    pub hand_number: u64,
    pub community_cards: Vec<String>,
    pub pot: i64,
    pub players: Vec<PlayerPublicView>,
    pub recipient_id: PlayerId,
    pub can_act: bool,
    pub current_bet: i64,
    pub call_amount: i64,
    pub minimum_raise: i64,
    pub legal_actions: Vec<LegalActionView>,
    pub showdown: Vec<ShowdownAwardView>,
}

/// Builds the snapshot a single `recipient` may see: own hole cards
/// always visible; opponents' only at true showdown (`hand_complete`
/// with more than one non-folded player).
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    game_id: &str,
    server_phase: &str,
    state: &GameState,
    betting_round: Option<&BettingRound>,
    folded: &HashSet<PlayerId>,
    all_in: &HashSet<PlayerId>,
    recipient: &PlayerId,
    showdown: &[ShowdownAward],
) -> Snapshot {
    let non_folded = state.players.len() - folded.len();
    let is_true_showdown = state.phase == GamePhase::HandComplete && non_folded > 1;

    let active_player = betting_round.and_then(|round| round.active_player());
    let can_act = active_player == Some(recipient);

    let players = state
        .players
        .iter()
        .map(|player| {
            let reveal = &player.id == recipient || (is_true_showdown && !folded.contains(&player.id));
            PlayerPublicView {
                id: player.id.clone(),
                chips: player.chips,
                seat: player.seat,
                visible_cards: if reveal {
                    player.hole_cards.iter().map(ToString::to_string).collect()
                } else {
                    Vec::new()
                },
                is_current_turn: active_player == Some(&player.id),
                folded: folded.contains(&player.id),
                all_in: all_in.contains(&player.id),
            }
        })
        .collect();

    let (current_bet, call_amount, minimum_raise, legal_actions) = match betting_round {
        Some(round) if can_act => (
            round.current_bet(),
            round.amount_to_call(recipient),
            round.minimum_raise(),
            round
                .legal_actions()
                .into_iter()
                .map(|action| LegalActionView {
                    action: action.to_string(),
                    minimum_raise: matches!(action, LegalAction::Raise).then(|| round.minimum_raise()),
                })
                .collect(),
        ),
        Some(round) => (round.current_bet(), 0, round.minimum_raise(), Vec::new()),
        None => (0, 0, 0, Vec::new()),
    };

    Snapshot {
        game_id: game_id.to_string(),
        server_phase: server_phase.to_string(),
        game_phase: state.phase.to_string(),
        hand_number: state.hand_number,
        community_cards: state.community_cards.iter().map(ToString::to_string).collect(),
        pot: betting_round.map(|r| r.pot()).unwrap_or(state.pot),
        players,
        recipient_id: recipient.clone(),
        can_act,
        current_bet,
        call_amount,
        minimum_raise,
        legal_actions,
        showdown: showdown.iter().map(ShowdownAwardView::from).collect(),
    }
}
