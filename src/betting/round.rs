use super::action::{Action, LegalAction};
use super::pots::{side_pots, SidePot};
use crate::cards::Street;
use crate::error::GameError;
use crate::game::player::PlayerId;
use std::collections::{HashMap, HashSet};

/// A player's standing within a single betting round: identity, seat,
/// and chips *not yet committed* to this round.
#[derive(Debug, Clone)]
pub struct RoundSeat {
    pub id: PlayerId,
    pub seat: usize,
    pub chips: i64,
}

/// Pure, deterministic state machine for one street of betting.
/// Every mutating method either succeeds and advances state, or
/// returns an error leaving `self` untouched — callers are expected
/// to validate with `process_action` rather than poke at fields
/// directly, which is why the fields themselves stay private.
#[derive(Debug, Clone)]
pub struct BettingRound {
    players: Vec<RoundSeat>,
    small_blind: i64,
    big_blind: i64,
    table_big_blind: i64,
    street: Street,
    pot: i64,
    current_bet: i64,
    player_bets: HashMap<PlayerId, i64>,
    active_index: usize,
    folded: HashSet<PlayerId>,
    all_in: HashSet<PlayerId>,
    last_raise_size: Option<i64>,
    players_who_can_act: HashSet<PlayerId>,
    last_raiser: Option<PlayerId>,
    button_seat: usize,
}

impl BettingRound {
    /// Preflop constructor: posts blinds from the canonical seats and
    /// seeds `current_bet`/`last_raise_size` from the big blind.
    pub fn new(
        mut players: Vec<RoundSeat>,
        small_blind: i64,
        big_blind: i64,
        button_seat: usize,
    ) -> Self {
        players.sort_by_key(|p| p.seat);
        let n = players.len();
        let sb_index = if n == 2 { button_seat } else { (button_seat + 1) % n };
        let bb_index = if n == 2 { (button_seat + 1) % n } else { (button_seat + 2) % n };

        let mut player_bets: HashMap<PlayerId, i64> =
            players.iter().map(|p| (p.id.clone(), 0)).collect();
        let mut all_in = HashSet::new();
        let mut pot = 0;

        let (sb_id, sb_committed, sb_shoved) = post_blind(&mut players[sb_index], small_blind);
        player_bets.insert(sb_id, sb_committed);
        pot += sb_committed;
        if sb_shoved {
            all_in.insert(players[sb_index].id.clone());
        }

        let (bb_id, bb_committed, bb_shoved) = post_blind(&mut players[bb_index], big_blind);
        player_bets.insert(bb_id, bb_committed);
        pot += bb_committed;
        if bb_shoved {
            all_in.insert(players[bb_index].id.clone());
        }

        let players_who_can_act: HashSet<PlayerId> = players
            .iter()
            .filter(|p| !all_in.contains(&p.id))
            .map(|p| p.id.clone())
            .collect();

        let active_index = if n == 2 { sb_index } else { (button_seat + 3) % n };

        Self {
            players,
            small_blind,
            big_blind,
            table_big_blind: big_blind,
            street: Street::Preflop,
            pot,
            current_bet: big_blind,
            player_bets,
            active_index,
            folded: HashSet::new(),
            all_in,
            last_raise_size: Some(big_blind),
            players_who_can_act,
            last_raiser: None,
            button_seat,
        }
    }

    /// Post-preflop constructor: no blinds posted; action starts with
    /// the first non-folded, non-all-in player clockwise from the
    /// button (which is the big blind in heads-up play, since the
    /// button itself is seat `button+1`'s only opponent).
    #[allow(clippy::too_many_arguments)]
    pub fn new_from_existing(
        mut players: Vec<RoundSeat>,
        carried_pot: i64,
        street: Street,
        button_seat: usize,
        folded: HashSet<PlayerId>,
        all_in: HashSet<PlayerId>,
        table_big_blind: i64,
    ) -> Self {
        players.sort_by_key(|p| p.seat);
        let player_bets: HashMap<PlayerId, i64> =
            players.iter().map(|p| (p.id.clone(), 0)).collect();
        let players_who_can_act: HashSet<PlayerId> = players
            .iter()
            .filter(|p| !folded.contains(&p.id) && !all_in.contains(&p.id))
            .map(|p| p.id.clone())
            .collect();
        let active_index = first_to_act_index(&players, &folded, &all_in, button_seat);

        Self {
            players,
            small_blind: 0,
            big_blind: 0,
            table_big_blind,
            street,
            pot: carried_pot,
            current_bet: 0,
            player_bets,
            active_index,
            folded,
            all_in,
            last_raise_size: None,
            players_who_can_act,
            last_raiser: None,
            button_seat,
        }
    }

    // -- accessors -----------------------------------------------------

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn pot(&self) -> i64 {
        self.pot
    }

    pub fn current_bet(&self) -> i64 {
        self.current_bet
    }

    pub fn players(&self) -> &[RoundSeat] {
        &self.players
    }

    pub fn folded(&self) -> &HashSet<PlayerId> {
        &self.folded
    }

    pub fn all_in(&self) -> &HashSet<PlayerId> {
        &self.all_in
    }

    pub fn player_bets(&self) -> &HashMap<PlayerId, i64> {
        &self.player_bets
    }

    pub fn last_raiser(&self) -> Option<&PlayerId> {
        self.last_raiser.as_ref()
    }

    pub fn chips_of(&self, id: &PlayerId) -> i64 {
        self.players
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.chips)
            .unwrap_or(0)
    }

    pub fn player_bet(&self, id: &PlayerId) -> i64 {
        *self.player_bets.get(id).unwrap_or(&0)
    }

    pub fn amount_to_call(&self, id: &PlayerId) -> i64 {
        (self.current_bet - self.player_bet(id)).max(0)
    }

    pub fn minimum_raise(&self) -> i64 {
        self.current_bet + self.last_raise_size.unwrap_or(self.table_big_blind)
    }

    pub fn active_player(&self) -> Option<&PlayerId> {
        if self.is_complete() {
            return None;
        }
        self.players.get(self.active_index).map(|p| &p.id)
    }

    pub fn players_who_can_act(&self) -> &HashSet<PlayerId> {
        &self.players_who_can_act
    }

    /// True when either at most one non-folded player remains, or
    /// every non-folded player has acted and matched `current_bet`.
    pub fn is_complete(&self) -> bool {
        let non_folded = self.players.len() - self.folded.len();
        non_folded <= 1 || self.players_who_can_act.is_empty()
    }

    fn opponents_can_respond(&self, actor: &PlayerId) -> bool {
        self.players
            .iter()
            .any(|p| &p.id != actor && !self.folded.contains(&p.id) && !self.all_in.contains(&p.id))
    }

    /// The menu of actions available to the active player.
    pub fn legal_actions(&self) -> Vec<LegalAction> {
        let Some(actor) = self.active_player() else {
            return Vec::new();
        };
        let actor = actor.clone();
        let to_call = self.amount_to_call(&actor);
        let chips = self.chips_of(&actor);
        let can_respond = self.opponents_can_respond(&actor);

        let mut actions = vec![LegalAction::Fold];
        if to_call > 0 {
            if chips >= to_call {
                actions.push(LegalAction::Call);
                if can_respond {
                    actions.push(LegalAction::Raise);
                    actions.push(LegalAction::AllIn);
                }
            } else {
                actions.push(LegalAction::AllIn);
            }
        } else {
            actions.push(LegalAction::Check);
            if can_respond {
                actions.push(LegalAction::Raise);
            }
            actions.push(LegalAction::AllIn);
        }
        actions
    }

    /// Validates and applies `action` on behalf of `actor_id`. On
    /// error `self` is left completely unmodified.
    pub fn process_action(&mut self, actor_id: &PlayerId, action: Action) -> Result<(), GameError> {
        if self.is_complete() {
            return Err(GameError::NoActiveBettingRound);
        }
        let active = self.active_player().ok_or(GameError::NoActiveBettingRound)?.clone();
        if &active != actor_id {
            return Err(GameError::NotYourTurn);
        }
        match action {
            Action::Fold => self.apply_fold(&active),
            Action::Call => self.apply_call(&active)?,
            Action::Check => self.apply_check(&active)?,
            Action::Raise(total) => self.apply_raise(&active, total)?,
            Action::AllIn => self.apply_all_in(&active),
        }
        self.advance_active();
        Ok(())
    }

    fn seat_mut(&mut self, id: &PlayerId) -> &mut RoundSeat {
        self.players
            .iter_mut()
            .find(|p| &p.id == id)
            .expect("actor must be seated in this round")
    }

    fn apply_fold(&mut self, actor: &PlayerId) {
        self.folded.insert(actor.clone());
        self.players_who_can_act.remove(actor);
    }

    fn apply_call(&mut self, actor: &PlayerId) -> Result<(), GameError> {
        let to_call = self.amount_to_call(actor);
        if to_call <= 0 {
            return Err(GameError::InvalidAction);
        }
        let chips = self.chips_of(actor);
        if chips < to_call {
            return Err(GameError::InsufficientChips);
        }
        let new_bet = self.player_bet(actor) + to_call;
        self.seat_mut(actor).chips -= to_call;
        self.player_bets.insert(actor.clone(), new_bet);
        self.pot += to_call;
        self.players_who_can_act.remove(actor);
        if self.chips_of(actor) == 0 {
            self.all_in.insert(actor.clone());
        }
        Ok(())
    }

    fn apply_check(&mut self, actor: &PlayerId) -> Result<(), GameError> {
        if self.amount_to_call(actor) != 0 {
            return Err(GameError::InvalidAction);
        }
        self.players_who_can_act.remove(actor);
        Ok(())
    }

    fn apply_raise(&mut self, actor: &PlayerId, total_amount: i64) -> Result<(), GameError> {
        if !self.opponents_can_respond(actor) {
            return Err(GameError::InvalidAction);
        }
        let minimum = self.minimum_raise();
        if total_amount < minimum {
            return Err(GameError::BelowMinimumRaise {
                attempted: total_amount,
                minimum,
            });
        }
        let prior_committed = self.player_bet(actor);
        let delta = total_amount - prior_committed;
        if delta <= 0 || delta > self.chips_of(actor) {
            return Err(GameError::InsufficientChips);
        }
        let prior_current_bet = self.current_bet;
        self.seat_mut(actor).chips -= delta;
        self.player_bets.insert(actor.clone(), total_amount);
        self.pot += delta;
        self.current_bet = total_amount;
        self.last_raise_size = Some(total_amount - prior_current_bet);
        self.last_raiser = Some(actor.clone());
        if self.chips_of(actor) == 0 {
            self.all_in.insert(actor.clone());
        }
        self.players_who_can_act = self
            .players
            .iter()
            .filter(|p| &p.id != actor && !self.folded.contains(&p.id) && !self.all_in.contains(&p.id))
            .map(|p| p.id.clone())
            .collect();
        Ok(())
    }

    fn apply_all_in(&mut self, actor: &PlayerId) {
        let chips = self.chips_of(actor);
        let prior_committed = self.player_bet(actor);
        let total = prior_committed + chips;
        let prior_current_bet = self.current_bet;
        let minimum = self.minimum_raise();

        self.seat_mut(actor).chips = 0;
        self.player_bets.insert(actor.clone(), total);
        self.pot += chips;
        self.all_in.insert(actor.clone());
        self.players_who_can_act.remove(actor);

        if total > prior_current_bet {
            self.current_bet = total;
            if total >= minimum {
                self.last_raise_size = Some(total - prior_current_bet);
                self.last_raiser = Some(actor.clone());
                self.players_who_can_act = self
                    .players
                    .iter()
                    .filter(|p| {
                        &p.id != actor && !self.folded.contains(&p.id) && !self.all_in.contains(&p.id)
                    })
                    .map(|p| p.id.clone())
                    .collect();
            }
            // else: an incomplete (under-minimum) all-in raise. current_bet
            // still rises, but betting does not reopen for players who had
            // already matched the previous current_bet, and the minimum
            // raise size for whoever acts next stays anchored to the last
            // full raise rather than this short increment.
        }
    }

    fn advance_active(&mut self) {
        if self.players_who_can_act.is_empty() {
            return;
        }
        let n = self.players.len();
        for offset in 1..=n {
            let idx = (self.active_index + offset) % n;
            if self.players_who_can_act.contains(&self.players[idx].id) {
                self.active_index = idx;
                return;
            }
        }
    }

    /// Side pots for this round's own commitments. Callers at
    /// showdown use the hand-spanning `original_betting_round`
    /// snapshot (see `GameActor`) when any all-in occurred on an
    /// earlier street, so that this reflects the full per-player
    /// commitment for the hand, not just the current street.
    pub fn side_pots(&self) -> Vec<SidePot> {
        let commitments: Vec<(PlayerId, i64)> = self
            .player_bets
            .iter()
            .map(|(id, amount)| (id.clone(), *amount))
            .collect();
        side_pots(&commitments, &self.folded)
    }

    /// Adds each player's pre-existing commitment from streets before
    /// this one into `player_bets`, without touching `pot` (already
    /// cumulative). Used once, when a round is first preserved as the
    /// hand-spanning snapshot, so `side_pots` sees the full per-player
    /// total rather than just this street's bets.
    pub fn backfill_prior_street_commitments(&mut self, prior: &HashMap<PlayerId, i64>) {
        for (id, amount) in prior {
            *self.player_bets.entry(id.clone()).or_insert(0) += amount;
        }
    }

    /// Folds a later street's bets into this (preserved) round's
    /// commitments, so a single `BettingRound` snapshot can represent
    /// the full-hand per-player total once any player has gone all-in
    /// and further streets are dealt without them.
    pub fn merge_additional_bets(&mut self, other: &BettingRound) {
        for (id, amount) in other.player_bets.iter() {
            *self.player_bets.entry(id.clone()).or_insert(0) += amount;
        }
        self.pot += other.player_bets.values().sum::<i64>();
        for id in other.folded.iter() {
            self.folded.insert(id.clone());
        }
    }
}

fn post_blind(seat: &mut RoundSeat, blind: i64) -> (PlayerId, i64, bool) {
    let committed = blind.min(seat.chips);
    seat.chips -= committed;
    (seat.id.clone(), committed, seat.chips == 0)
}

fn first_to_act_index(
    players: &[RoundSeat],
    folded: &HashSet<PlayerId>,
    all_in: &HashSet<PlayerId>,
    button_seat: usize,
) -> usize {
    let n = players.len();
    for offset in 1..=n {
        let idx = (button_seat + offset) % n;
        let id = &players[idx].id;
        if !folded.contains(id) && !all_in.contains(id) {
            return idx;
        }
    }
    button_seat % n.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats(stacks: &[(&str, i64)]) -> Vec<RoundSeat> {
        stacks
            .iter()
            .enumerate()
            .map(|(seat, (id, chips))| RoundSeat {
                id: id.to_string(),
                seat,
                chips: *chips,
            })
            .collect()
    }

    #[test]
    fn heads_up_preflop_button_acts_first() {
        let round = BettingRound::new(seats(&[("a", 1000), ("b", 1000)]), 10, 20, 0);
        assert_eq!(round.active_player().unwrap(), "a");
        assert_eq!(round.pot(), 30);
        assert_eq!(round.current_bet(), 20);
    }

    #[test]
    fn scenario_heads_up_limp_check_completes_round() {
        let mut round = BettingRound::new(seats(&[("a", 1000), ("b", 1000)]), 10, 20, 0);
        round.process_action(&"a".to_string(), Action::Call).unwrap();
        assert_eq!(round.pot(), 40);
        assert!(!round.is_complete());
        round.process_action(&"b".to_string(), Action::Check).unwrap();
        assert!(round.is_complete());
        assert_eq!(round.chips_of(&"a".to_string()), 980);
        assert_eq!(round.chips_of(&"b".to_string()), 980);
    }

    #[test]
    fn fold_with_two_players_ends_round_immediately() {
        let mut round = BettingRound::new(seats(&[("a", 1000), ("b", 1000)]), 10, 20, 0);
        round.process_action(&"a".to_string(), Action::Fold).unwrap();
        assert!(round.is_complete());
    }

    #[test]
    fn minimum_raise_enforcement() {
        let mut round = BettingRound::new(
            seats(&[("sb", 1000), ("bb", 1000), ("utg", 1000)]),
            10,
            20,
            0,
        );
        // action starts UTG in 3-handed play (button+3 == seat 0 here == sb... with n=3, button=0,
        // sb_index=1, bb_index=2, active = (0+3)%3 = 0 == sb). Re-derive seat names accordingly.
        let err = round
            .process_action(&round.active_player().unwrap().clone(), Action::Raise(25))
            .unwrap_err();
        assert_eq!(err, GameError::BelowMinimumRaise { attempted: 25, minimum: 40 });
        let actor = round.active_player().unwrap().clone();
        round.process_action(&actor, Action::Raise(40)).unwrap();
        let next = round.active_player().unwrap().clone();
        let err2 = round.process_action(&next, Action::Raise(80)).unwrap_err();
        assert_eq!(err2, GameError::BelowMinimumRaise { attempted: 80, minimum: 60 });
        round.process_action(&next, Action::Raise(60)).unwrap();
    }

    #[test]
    fn incomplete_all_in_raise_does_not_shrink_the_next_minimum_raise() {
        // current_bet=100, last_raise_size=100 (min raise 200) straight off
        // the blinds. The short-stacked first-to-act player shoves for only
        // 120 — a raise, but far below the 200 needed to be a full one.
        let mut round = BettingRound::new(seats(&[("a", 120), ("b", 1000), ("c", 1000)]), 50, 100, 0);
        assert_eq!(round.active_player().unwrap(), "a");
        assert_eq!(round.minimum_raise(), 200);
        round.process_action(&"a".to_string(), Action::AllIn).unwrap();
        assert_eq!(round.current_bet(), 120);
        assert_eq!(
            round.minimum_raise(),
            220,
            "an incomplete all-in raise must not shrink the minimum full raise below the last real raise size"
        );
    }

    #[test]
    fn all_in_below_minimum_does_not_reopen_preflop() {
        // BB posts 20, has only 25 total chips, goes all-in for 25 after SB calls.
        let mut round = BettingRound::new(seats(&[("sb", 1000), ("bb", 25)]), 10, 20, 0);
        round.process_action(&"sb".to_string(), Action::Call).unwrap();
        // BB is active (heads-up, non-button acts second preflop after SB/button acts).
        assert_eq!(round.active_player().unwrap(), "bb");
        round.process_action(&"bb".to_string(), Action::AllIn).unwrap();
        assert!(round.is_complete(), "sb already matched 20 and the extra 5 does not reopen action");
    }

    #[test]
    fn side_pots_for_three_equal_all_ins() {
        let mut round = BettingRound::new(seats(&[("a", 100), ("b", 500), ("c", 1000)]), 5, 10, 0);
        let a = round.active_player().unwrap().clone();
        round.process_action(&a, Action::AllIn).unwrap();
        let b = round.active_player().unwrap().clone();
        round.process_action(&b, Action::Call).unwrap();
        let c = round.active_player().unwrap().clone();
        round.process_action(&c, Action::Call).unwrap();
        assert!(round.is_complete());
        let pots = round.side_pots();
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 300);
        assert_eq!(pots[0].eligible.len(), 3);
    }

    #[test]
    fn raise_rejected_once_no_opponent_can_respond() {
        // BB is already all-in for less than a full call; SB still owes
        // chips but the only opponent left can't respond to a raise, so
        // legal_actions offers fold/call only and a raise must be refused
        // even if a client sends one anyway.
        let mut round = BettingRound::new(seats(&[("sb", 1000), ("bb", 15)]), 10, 20, 0);
        assert_eq!(round.active_player().unwrap(), "sb");
        assert!(!round.legal_actions().contains(&LegalAction::Raise));
        let err = round.process_action(&"sb".to_string(), Action::Raise(60)).unwrap_err();
        assert_eq!(err, GameError::InvalidAction);
    }
}
