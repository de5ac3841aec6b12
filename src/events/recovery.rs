use super::event::{Event, EventPayload};
use crate::betting::Action;
use crate::cards::Street;
use crate::game::engine::GameEngine;
use crate::game::player::Player;
use anyhow::{anyhow, Result};

/// Deterministically rebuilds a `GameEngine` by replaying a
/// tournament's event log from the start. Every branch here drives
/// the exact same `GameEngine` methods the live
/// `GameActor` calls — recovery never re-derives or approximates
/// state, it reapplies the same recorded facts through the same code,
/// which is what makes the replay byte-for-byte identical to the
/// state that actually produced the log.
pub fn replay(events: &[Event]) -> Result<GameEngine> {
    let mut engine: Option<GameEngine> = None;

    for event in events {
        match &event.payload {
            EventPayload::TournamentCreated { players, small_blind, big_blind } => {
                let seated = players.iter().map(|(id, seat, chips)| Player::new(id.clone(), *chips, *seat)).collect();
                engine = Some(GameEngine::new(seated, *small_blind, *big_blind));
            }
            EventPayload::HandStarted { hand_number, button_seat, players, hole_cards } => {
                let engine = engine.as_mut().ok_or_else(|| anyhow!("hand_started before tournament_created"))?;
                engine.resume_hand(*hand_number, *button_seat, players, hole_cards);
            }
            EventPayload::CommunityDealt { street, cards } => {
                let engine = engine.as_mut().ok_or_else(|| anyhow!("community_dealt before any hand"))?;
                engine
                    .apply_community_cards(parse_street(street)?, cards.clone())
                    .map_err(|e| anyhow!("replaying community_dealt: {e}"))?;
            }
            EventPayload::PlayerFolded { player_id, .. } => apply(&mut engine, player_id, Action::Fold)?,
            EventPayload::PlayerCalled { player_id, .. } => apply(&mut engine, player_id, Action::Call)?,
            EventPayload::PlayerChecked { player_id, .. } => apply(&mut engine, player_id, Action::Check)?,
            EventPayload::PlayerRaised { player_id, total, .. } => apply(&mut engine, player_id, Action::Raise(*total))?,
            EventPayload::PlayerAllIn { player_id, .. } => apply(&mut engine, player_id, Action::AllIn)?,
            // Derivable from the hole/community cards already replayed
            // above; kept in the log purely for an operator's audit trail.
            EventPayload::HandCompleted { .. } => {}
            EventPayload::TournamentEnded { .. } => {}
        }
    }

    engine.ok_or_else(|| anyhow!("event log contained no tournament_created event"))
}

fn apply(engine: &mut Option<GameEngine>, player_id: &str, action: Action) -> Result<()> {
    let engine = engine.as_mut().ok_or_else(|| anyhow!("player action before any hand was started"))?;
    engine.apply_action(&player_id.to_string(), action).map_err(|e| anyhow!("replaying action: {e}"))?;
    if engine.round_complete() {
        engine.resolve_round_completion().map_err(|e| anyhow!("resolving replayed round: {e}"))?;
    }
    Ok(())
}

fn parse_street(s: &str) -> Result<Street> {
    match s {
        "flop" => Ok(Street::Flop),
        "turn" => Ok(Street::Turn),
        "river" => Ok(Street::River),
        other => Err(anyhow!("community_dealt event names an unknown street: {other}")),
    }
}
