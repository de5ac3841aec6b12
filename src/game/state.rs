use super::player::{Player, PlayerId};
use crate::betting::RoundSeat;
use crate::betting::{BettingRound, SidePot};
use crate::cards::{Card, Deck, Street};
use crate::error::GameError;
use std::collections::HashSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Cross-street game state. Owned exclusively by a single
/// [`super::actor::GameActor`] — never shared, never locked.
#[derive(Debug, Clone)]
pub struct GameState {
    pub players: Vec<Player>,
    pub community_cards: Vec<Card>,
    pub pot: i64,
    pub phase: GamePhase,
    pub hand_number: u64,
    pub deck: Deck,
    pub button_seat: usize,
    pub small_blind: i64,
    pub big_blind: i64,
}

/// Cross-street phase. Distinct from `GameActor::server_phase`, which
/// additionally distinguishes which street's betting round is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    HandComplete,
    TournamentComplete,
}

impl Display for GamePhase {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{}",
            match self {
                GamePhase::Waiting => "waiting",
                GamePhase::Preflop => "preflop",
                GamePhase::Flop => "flop",
                GamePhase::Turn => "turn",
                GamePhase::River => "river",
                GamePhase::HandComplete => "hand_complete",
                GamePhase::TournamentComplete => "tournament_complete",
            }
        )
    }
}

impl From<Street> for GamePhase {
    fn from(street: Street) -> Self {
        match street {
            Street::Preflop => GamePhase::Preflop,
            Street::Flop => GamePhase::Flop,
            Street::Turn => GamePhase::Turn,
            Street::River => GamePhase::River,
        }
    }
}

/// A single winner's award from showdown, for `ViewBuilder` and the
/// persisted `hand_complete`-adjacent events.
#[derive(Debug, Clone)]
pub struct ShowdownAward {
    pub pot_amount: i64,
    pub winners: Vec<PlayerId>,
    pub amount_per_winner: i64,
    pub odd_chip_winner: Option<PlayerId>,
    pub hand_description: String,
}

impl GameState {
    /// A fresh table, button parked one seat before seat 0 so the
    /// first `start_hand` advances it onto seat 0.
    pub fn new(players: Vec<Player>, small_blind: i64, big_blind: i64) -> Self {
        let n = players.len().max(1);
        Self {
            players,
            community_cards: Vec::new(),
            pot: 0,
            phase: GamePhase::Waiting,
            hand_number: 0,
            deck: Deck::new(),
            button_seat: n - 1,
            small_blind,
            big_blind,
        }
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    pub fn seated_count(&self) -> usize {
        self.players.len()
    }

    pub fn players_with_chips(&self) -> usize {
        self.players.iter().filter(|p| p.chips > 0).count()
    }

    /// Removes any player with zero chips, compacting seats to
    /// `0..M-1` and repositioning the button: it stays on the
    /// surviving holder if they remain, else moves to the nearest
    /// surviving seat clockwise.
    pub fn eliminate_and_compact(&mut self) {
        if self.players.iter().all(|p| p.chips > 0) {
            return;
        }
        self.players.sort_by_key(|p| p.seat);
        let button_id = self.players.iter().find(|p| p.seat == self.button_seat).map(|p| p.id.clone());
        let button_survived = button_id.as_ref().is_some_and(|id| self.player(id).is_some_and(|p| p.chips > 0));
        // Resolved against the *old* seat numbering, before the
        // survivors below get renumbered to 0..M-1, since `button_seat`
        // is still in that old space here.
        let fallback_id = (!button_survived).then(|| self.nearest_clockwise_survivor(self.button_seat)).flatten();
        let survivors: Vec<Player> = self
            .players
            .drain(..)
            .filter(|p| p.chips > 0)
            .collect();
        self.players = survivors;
        for (seat, player) in self.players.iter_mut().enumerate() {
            player.seat = seat;
        }
        let chosen = if button_survived { button_id } else { fallback_id };
        self.button_seat = chosen.and_then(|id| self.player(&id).map(|p| p.seat)).unwrap_or(0);
    }

    /// The surviving player sitting at or after `from` in the old seat
    /// numbering, wrapping to the lowest surviving seat if none does.
    fn nearest_clockwise_survivor(&self, from: usize) -> Option<PlayerId> {
        let mut survivors: Vec<&Player> = self.players.iter().filter(|p| p.chips > 0).collect();
        survivors.sort_by_key(|p| p.seat);
        survivors
            .iter()
            .find(|p| p.seat >= from)
            .or_else(|| survivors.first())
            .map(|p| p.id.clone())
    }

    pub fn advance_button(&mut self) {
        let n = self.players.len().max(1);
        self.button_seat = (self.button_seat + 1) % n;
    }

    /// Snapshot of seat/chip data for handing to `BettingRound`'s
    /// constructors, which own the actual blind-posting math.
    pub fn round_seats(&self) -> Vec<RoundSeat> {
        self.players
            .iter()
            .map(|p| RoundSeat {
                id: p.id.clone(),
                seat: p.seat,
                chips: p.chips,
            })
            .collect()
    }

    /// Pulls chip counts and pot back out of a completed/in-progress
    /// `BettingRound` into the persistent player list.
    pub fn sync_from_round(&mut self, round: &BettingRound) {
        for seat in round.players() {
            if let Some(player) = self.player_mut(&seat.id) {
                player.chips = seat.chips;
            }
        }
        self.pot = round.pot();
    }

    pub fn deal_hole_cards(&mut self) -> Result<(), GameError> {
        self.players.sort_by_key(|p| p.seat);
        for player in self.players.iter_mut() {
            player.hole_cards = self.deck.deal_n(2)?;
        }
        Ok(())
    }

    pub fn deal_flop(&mut self) -> Result<(), GameError> {
        self.community_cards = self.deck.burn_and_deal(3)?;
        Ok(())
    }

    pub fn deal_next_street_card(&mut self) -> Result<(), GameError> {
        let mut dealt = self.deck.burn_and_deal(1)?;
        self.community_cards.append(&mut dealt);
        Ok(())
    }

    pub fn hole_cards_of(&self, id: &PlayerId) -> &[Card] {
        self.player(id).map(|p| p.hole_cards.as_slice()).unwrap_or(&[])
    }

    /// Credits a showdown pot's winners, splitting evenly with the
    /// remainder going to whichever eligible winner sits closest
    /// clockwise from the button.
    pub fn award_pot(&mut self, pot: &SidePot, winners: &[PlayerId]) -> ShowdownAward {
        debug_assert!(!winners.is_empty());
        let share = pot.amount / winners.len() as i64;
        let remainder = pot.amount % winners.len() as i64;
        for winner in winners {
            if let Some(player) = self.player_mut(winner) {
                player.chips += share;
            }
        }
        let odd_chip_winner = if remainder > 0 {
            let winner = self.closest_clockwise_from_button(winners);
            if let Some(player) = self.player_mut(&winner) {
                player.chips += remainder;
            }
            Some(winner)
        } else {
            None
        };
        ShowdownAward {
            pot_amount: pot.amount,
            winners: winners.to_vec(),
            amount_per_winner: share,
            odd_chip_winner,
            hand_description: String::new(),
        }
    }

    fn closest_clockwise_from_button(&self, candidates: &[PlayerId]) -> PlayerId {
        let n = self.players.len().max(1);
        candidates
            .iter()
            .min_by_key(|id| {
                let seat = self.player(id).map(|p| p.seat).unwrap_or(0);
                (seat + n - self.button_seat - 1) % n
            })
            .cloned()
            .expect("candidates must be non-empty")
    }

    pub fn non_folded_ids(&self, folded: &HashSet<PlayerId>) -> Vec<PlayerId> {
        self.players
            .iter()
            .map(|p| p.id.clone())
            .filter(|id| !folded.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(stacks: &[(&str, i64)]) -> GameState {
        let players: Vec<Player> = stacks
            .iter()
            .enumerate()
            .map(|(seat, (id, chips))| Player::new(*id, *chips, seat))
            .collect();
        GameState::new(players, 10, 20)
    }

    #[test]
    fn eliminate_and_compact_reassigns_dense_seats() {
        let mut s = state(&[("a", 100), ("b", 0), ("c", 50)]);
        s.eliminate_and_compact();
        assert_eq!(s.players.len(), 2);
        assert_eq!(s.players[0].id, "a");
        assert_eq!(s.players[0].seat, 0);
        assert_eq!(s.players[1].id, "c");
        assert_eq!(s.players[1].seat, 1);
    }

    #[test]
    fn button_moves_to_surviving_holders_new_seat() {
        let mut s = state(&[("a", 100), ("b", 0), ("c", 50)]);
        s.button_seat = 2; // c held the button
        s.eliminate_and_compact();
        assert_eq!(s.button_seat, 1, "c now sits at seat 1 after compaction");
    }

    #[test]
    fn button_moves_to_nearest_clockwise_survivor_in_old_seat_order() {
        // 6 seats; the button-holder at old seat 2 busts along with
        // seat 1 and seat 5. Survivors sit at old seats 0, 3, 4, which
        // renumber to new seats 0, 1, 2. The nearest clockwise survivor
        // from old seat 2 is old seat 3 (new seat 1), not whichever
        // player ends up renumbered to seat 2.
        let mut s = state(&[("a", 100), ("b", 0), ("c", 0), ("d", 100), ("e", 100), ("f", 0)]);
        s.button_seat = 2; // c held the button and busted
        s.eliminate_and_compact();
        assert_eq!(s.players.len(), 3);
        assert_eq!(s.button_seat, 1, "d (old seat 3) is nearest clockwise from the busted button, now at new seat 1");
        assert_eq!(s.players[s.button_seat].id, "d");
    }

    #[test]
    fn odd_chip_goes_to_winner_closest_clockwise_from_button() {
        let mut s = state(&[("a", 0), ("b", 0), ("c", 0)]);
        s.button_seat = 0;
        let pot = SidePot { amount: 11, eligible: vec!["b".into(), "c".into()] };
        let award = s.award_pot(&pot, &["b".to_string(), "c".to_string()]);
        assert_eq!(award.amount_per_winner, 5);
        assert_eq!(award.odd_chip_winner, Some("b".to_string()));
        assert_eq!(s.player(&"b".to_string()).unwrap().chips, 6);
        assert_eq!(s.player(&"c".to_string()).unwrap().chips, 5);
    }
}
