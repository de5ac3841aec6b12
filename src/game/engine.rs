use super::player::{Player, PlayerId};
use super::state::{GamePhase, GameState, ShowdownAward};
use crate::betting::{Action, BettingRound, SidePot};
use crate::cards::evaluator::{determine_winners, evaluate_best};
use crate::cards::{Card, Deck, Street};
use crate::error::GameError;
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Mirrors the actor-level `server_phase`: coarser than `GamePhase` in
/// that it additionally distinguishes which street's betting round is
/// live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPhase {
    WaitingToStart,
    PreflopBetting,
    FlopBetting,
    TurnBetting,
    RiverBetting,
    HandComplete,
    TournamentComplete,
    GameEnded,
}

impl Display for ServerPhase {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{}",
            match self {
                ServerPhase::WaitingToStart => "waiting_to_start",
                ServerPhase::PreflopBetting => "preflop_betting",
                ServerPhase::FlopBetting => "flop_betting",
                ServerPhase::TurnBetting => "turn_betting",
                ServerPhase::RiverBetting => "river_betting",
                ServerPhase::HandComplete => "hand_complete",
                ServerPhase::TournamentComplete => "tournament_complete",
                ServerPhase::GameEnded => "game_ended",
            }
        )
    }
}

/// What a freshly dealt hand looked like, for the caller to persist as
/// a `hand_started` event before replaying it back through
/// [`GameEngine::resume_hand`] during recovery.
#[derive(Debug, Clone)]
pub struct HandStartedOutcome {
    pub hand_number: u64,
    pub button_seat: usize,
    pub players: Vec<(PlayerId, usize, i64)>,
    pub hole_cards: HashMap<PlayerId, Vec<Card>>,
}

/// What happens once a betting round finishes, driving the caller's
/// next step.
#[derive(Debug, Clone)]
pub enum RoundResolution {
    /// The next street needs dealing before play continues. Caller
    /// draws (or replays) the cards and calls `apply_community_cards`.
    NeedsStreet(Street),
    /// A street was just dealt and at least one player can still act.
    AwaitingAction,
    /// All but one player folded; `winner` took the pot uncontested.
    FoldWin { winner: PlayerId, pot: i64 },
    /// Showdown resolved; these pots were awarded.
    Showdown(Vec<ShowdownAward>),
}

/// The pure hand-lifecycle controller composing `GameState` +
/// `BettingRound`. Both the live [`super::actor::GameActor`] and the
/// crash-recovery reducer ([`crate::events::recovery`]) drive the
/// *same* methods here — recovery replays recorded hole/community
/// cards instead of drawing from a live deck, but every state
/// transition afterward runs through identical code, which is what
/// makes replay byte-for-byte deterministic.
#[derive(Debug, Clone)]
pub struct GameEngine {
    pub state: GameState,
    pub betting_round: Option<BettingRound>,
    pub original_betting_round: Option<BettingRound>,
    pub server_phase: ServerPhase,
    pub folded: HashSet<PlayerId>,
    pub all_in: HashSet<PlayerId>,
    pub last_showdown: Vec<ShowdownAward>,
    hand_start_chips: HashMap<PlayerId, i64>,
}

impl GameEngine {
    pub fn new(players: Vec<Player>, small_blind: i64, big_blind: i64) -> Self {
        Self {
            state: GameState::new(players, small_blind, big_blind),
            betting_round: None,
            original_betting_round: None,
            server_phase: ServerPhase::WaitingToStart,
            folded: HashSet::new(),
            all_in: HashSet::new(),
            last_showdown: Vec::new(),
            hand_start_chips: HashMap::new(),
        }
    }

    /// `start_hand`, live path: eliminates busted players, advances
    /// the button, shuffles a fresh deck, and deals. Returns `None`
    /// when the tournament is already decided.
    pub fn start_new_hand(&mut self) -> Result<Option<HandStartedOutcome>, GameError> {
        self.state.eliminate_and_compact();
        if self.state.players_with_chips() <= 1 {
            self.state.phase = GamePhase::TournamentComplete;
            self.server_phase = ServerPhase::TournamentComplete;
            return Ok(None);
        }
        self.state.advance_button();
        self.state.hand_number += 1;
        self.state.deck = Deck::new();
        self.state.community_cards.clear();
        self.state.deal_hole_cards()?;

        let hole_cards = self
            .state
            .players
            .iter()
            .map(|p| (p.id.clone(), p.hole_cards.clone()))
            .collect();
        let players = self.state.players.iter().map(|p| (p.id.clone(), p.seat, p.chips)).collect();

        self.construct_preflop_round();

        Ok(Some(HandStartedOutcome {
            hand_number: self.state.hand_number,
            button_seat: self.state.button_seat,
            players,
            hole_cards,
        }))
    }

    /// Recovery path: installs a previously-dealt hand's recorded
    /// positions and hole cards verbatim rather than drawing new ones.
    pub fn resume_hand(
        &mut self,
        hand_number: u64,
        button_seat: usize,
        players: &[(PlayerId, usize, i64)],
        hole_cards: &HashMap<PlayerId, Vec<Card>>,
    ) {
        for (id, seat, chips) in players {
            if let Some(player) = self.state.player_mut(id) {
                player.seat = *seat;
                player.chips = *chips;
            }
        }
        self.state.players.sort_by_key(|p| p.seat);
        self.state.hand_number = hand_number;
        self.state.button_seat = button_seat;
        self.state.community_cards.clear();
        for (id, cards) in hole_cards {
            if let Some(player) = self.state.player_mut(id) {
                player.hole_cards = cards.clone();
            }
        }
        self.construct_preflop_round();
    }

    fn construct_preflop_round(&mut self) {
        self.hand_start_chips = self.state.players.iter().map(|p| (p.id.clone(), p.chips)).collect();
        let seats = self.state.round_seats();
        let round = BettingRound::new(seats, self.state.small_blind, self.state.big_blind, self.state.button_seat);
        self.state.sync_from_round(&round);
        self.folded.clear();
        self.all_in.clear();
        self.original_betting_round = None;
        self.last_showdown.clear();
        self.betting_round = Some(round);
        self.state.phase = GamePhase::Preflop;
        self.server_phase = ServerPhase::PreflopBetting;
    }

    /// Delegates to the live `BettingRound`, then folds the actor-level
    /// `folded`/`all_in` sets forward (they survive street boundaries
    /// even though a fresh `BettingRound` does not).
    pub fn apply_action(&mut self, actor_id: &PlayerId, action: Action) -> Result<(), GameError> {
        let round = self.betting_round.as_mut().ok_or(GameError::NoActiveBettingRound)?;
        round.process_action(actor_id, action)?;
        for id in round.folded() {
            self.folded.insert(id.clone());
        }
        for id in round.all_in() {
            self.all_in.insert(id.clone());
        }
        self.state.sync_from_round(round);
        Ok(())
    }

    pub fn round_complete(&self) -> bool {
        self.betting_round.as_ref().is_some_and(|r| r.is_complete())
    }

    /// Folds the just-finished street into `original_betting_round`
    /// (creating it on the street where the first all-in happened,
    /// merging into it on every subsequent street), then decides what
    /// happens next.
    pub fn resolve_round_completion(&mut self) -> Result<RoundResolution, GameError> {
        let round = self.betting_round.clone().ok_or(GameError::NoActiveBettingRound)?;
        debug_assert!(round.is_complete(), "resolve_round_completion called on a live round");
        self.fold_into_original(&round);

        let non_folded = self.state.non_folded_ids(&self.folded);
        if non_folded.len() <= 1 {
            let winner = non_folded.into_iter().next().expect("at least one player remains seated");
            let pot = round.pot();
            if let Some(player) = self.state.player_mut(&winner) {
                player.chips += pot;
            }
            self.state.pot = 0;
            self.state.phase = GamePhase::HandComplete;
            self.server_phase = ServerPhase::HandComplete;
            self.last_showdown.clear();
            self.betting_round = None;
            self.original_betting_round = None;
            return Ok(RoundResolution::FoldWin { winner, pot });
        }

        match round.street().next() {
            Some(next) => Ok(RoundResolution::NeedsStreet(next)),
            None => {
                let awards = self.run_showdown(&round)?;
                Ok(RoundResolution::Showdown(awards))
            }
        }
    }

    fn fold_into_original(&mut self, round: &BettingRound) {
        if self.all_in.is_empty() {
            return;
        }
        match self.original_betting_round.as_mut() {
            Some(original) => original.merge_additional_bets(round),
            None => {
                // `round`'s own `player_bets` only holds this street's
                // commitments (earlier streets reset to 0 on every new
                // `BettingRound`); back them in from the chip delta
                // since the hand started, or side pot totals undercount
                // every hand where the all-in lands after the first
                // street.
                let prior: HashMap<PlayerId, i64> = self
                    .state
                    .players
                    .iter()
                    .map(|p| {
                        let start = self.hand_start_chips.get(&p.id).copied().unwrap_or(p.chips);
                        let contributed_total = start - p.chips;
                        let contributed_this_street = round.player_bet(&p.id);
                        let prior_streets = contributed_total - contributed_this_street;
                        debug_assert!(prior_streets >= 0, "a player cannot have contributed negative chips before this street");
                        (p.id.clone(), prior_streets)
                    })
                    .collect();
                let mut original = round.clone();
                original.backfill_prior_street_commitments(&prior);
                self.original_betting_round = Some(original);
            }
        }
    }

    /// Installs the next street's community cards (drawn live or
    /// replayed from a `community_dealt` event) and opens the next
    /// betting round. If every remaining player is already all-in the
    /// new round is immediately complete, and this recurses through
    /// `resolve_round_completion` without waiting for input.
    pub fn apply_community_cards(&mut self, street: Street, cards: Vec<Card>) -> Result<RoundResolution, GameError> {
        self.state.community_cards.extend(cards);
        self.betting_round = None;

        let seats = self.state.round_seats();
        let pot = self.state.pot;
        let round = BettingRound::new_from_existing(
            seats,
            pot,
            street,
            self.state.button_seat,
            self.folded.clone(),
            self.all_in.clone(),
            self.state.big_blind,
        );
        self.state.phase = GamePhase::from(street);
        self.server_phase = match street {
            Street::Flop => ServerPhase::FlopBetting,
            Street::Turn => ServerPhase::TurnBetting,
            Street::River => ServerPhase::RiverBetting,
            Street::Preflop => unreachable!("community cards are never dealt for preflop"),
        };
        let already_complete = round.is_complete();
        self.betting_round = Some(round);

        if already_complete {
            self.resolve_round_completion()
        } else {
            Ok(RoundResolution::AwaitingAction)
        }
    }

    fn run_showdown(&mut self, final_round: &BettingRound) -> Result<Vec<ShowdownAward>, GameError> {
        let pots: Vec<SidePot> = match &self.original_betting_round {
            Some(original) => original.side_pots(),
            None => vec![SidePot {
                amount: final_round.pot(),
                eligible: self.state.non_folded_ids(&self.folded),
            }],
        };

        let mut awards = Vec::with_capacity(pots.len());
        for pot in &pots {
            let values: Vec<(usize, crate::cards::HandValue)> = pot
                .eligible
                .iter()
                .enumerate()
                .map(|(i, id)| {
                    let hole = self.state.hole_cards_of(id);
                    (i, evaluate_best(hole, &self.state.community_cards))
                })
                .collect();
            let winner_indices = determine_winners(&values);
            let winners: Vec<PlayerId> = winner_indices.iter().map(|&i| pot.eligible[i].clone()).collect();
            let description = values
                .iter()
                .find(|(i, _)| winner_indices.contains(i))
                .map(|(_, v)| v.category.to_string())
                .unwrap_or_default();

            let mut award = self.state.award_pot(pot, &winners);
            award.hand_description = description;
            awards.push(award);
        }

        self.state.phase = GamePhase::HandComplete;
        self.server_phase = ServerPhase::HandComplete;
        self.last_showdown = awards.clone();
        self.betting_round = None;
        self.original_betting_round = None;
        Ok(awards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::Player;

    fn engine(stacks: &[(&str, i64)]) -> GameEngine {
        let players: Vec<Player> = stacks.iter().enumerate().map(|(seat, (id, chips))| Player::new(*id, *chips, seat)).collect();
        GameEngine::new(players, 10, 20)
    }

    #[test]
    fn heads_up_limp_check_reaches_flop_with_three_community_cards() {
        let mut e = engine(&[("a", 1000), ("b", 1000)]);
        e.start_new_hand().unwrap();
        let a = e.betting_round.as_ref().unwrap().active_player().unwrap().clone();
        e.apply_action(&a, Action::Call).unwrap();
        let b = e.betting_round.as_ref().unwrap().active_player().unwrap().clone();
        e.apply_action(&b, Action::Check).unwrap();
        assert!(e.round_complete());
        match e.resolve_round_completion().unwrap() {
            RoundResolution::NeedsStreet(Street::Flop) => {}
            other => panic!("expected NeedsStreet(Flop), got {other:?}"),
        }
        let cards = e.state.deck.burn_and_deal(3).unwrap();
        e.apply_community_cards(Street::Flop, cards).unwrap();
        assert_eq!(e.state.community_cards.len(), 3);
        assert_eq!(e.state.pot, 40);
        assert_eq!(e.server_phase, ServerPhase::FlopBetting);
    }

    #[test]
    fn preflop_fold_awards_pot_without_showdown() {
        let mut e = engine(&[("a", 1000), ("b", 1000)]);
        e.start_new_hand().unwrap();
        let a = e.betting_round.as_ref().unwrap().active_player().unwrap().clone();
        e.apply_action(&a, Action::Fold).unwrap();
        match e.resolve_round_completion().unwrap() {
            RoundResolution::FoldWin { winner, pot } => {
                assert_eq!(winner, "b");
                assert_eq!(pot, 30);
            }
            other => panic!("expected FoldWin, got {other:?}"),
        }
        assert_eq!(e.state.player(&"b".to_string()).unwrap().chips, 1010);
        assert_eq!(e.state.player(&"a".to_string()).unwrap().chips, 990);
        assert_eq!(e.server_phase, ServerPhase::HandComplete);
    }

    /// Preflop completes with no all-in, then the short stack shoves on
    /// the flop. `original_betting_round` is only ever created on the
    /// street where the first all-in happens, so this is the scenario
    /// that would silently drop the preflop pot if that snapshot wasn't
    /// backfilled with each player's earlier-street commitments.
    #[test]
    fn all_in_after_a_completed_preflop_street_conserves_every_chip() {
        let mut e = engine(&[("a", 1000), ("c", 100), ("b", 1000)]);
        e.start_new_hand().unwrap();
        let starting_total: i64 = e.state.players.iter().map(|p| p.chips).sum::<i64>() + e.state.pot;
        assert_eq!(starting_total, 2100);

        assert_eq!(e.betting_round.as_ref().unwrap().active_player().unwrap(), "a");
        e.apply_action(&"a".to_string(), Action::Call).unwrap();
        assert_eq!(e.betting_round.as_ref().unwrap().active_player().unwrap(), "c");
        e.apply_action(&"c".to_string(), Action::Call).unwrap();
        assert_eq!(e.betting_round.as_ref().unwrap().active_player().unwrap(), "b");
        e.apply_action(&"b".to_string(), Action::Check).unwrap();
        assert!(e.round_complete());
        assert!(e.all_in.is_empty(), "no one is all-in after a normal preflop street");
        match e.resolve_round_completion().unwrap() {
            RoundResolution::NeedsStreet(Street::Flop) => {}
            other => panic!("expected NeedsStreet(Flop), got {other:?}"),
        }
        assert_eq!(e.state.pot, 60);

        let flop = e.state.deck.burn_and_deal(3).unwrap();
        match e.apply_community_cards(Street::Flop, flop).unwrap() {
            RoundResolution::AwaitingAction => {}
            other => panic!("expected AwaitingAction, got {other:?}"),
        }

        assert_eq!(e.betting_round.as_ref().unwrap().active_player().unwrap(), "c");
        e.apply_action(&"c".to_string(), Action::AllIn).unwrap();
        assert_eq!(e.betting_round.as_ref().unwrap().active_player().unwrap(), "b");
        e.apply_action(&"b".to_string(), Action::Call).unwrap();
        assert_eq!(e.betting_round.as_ref().unwrap().active_player().unwrap(), "a");
        e.apply_action(&"a".to_string(), Action::Call).unwrap();
        assert!(e.round_complete());

        match e.resolve_round_completion().unwrap() {
            RoundResolution::NeedsStreet(Street::Turn) => {}
            other => panic!("expected NeedsStreet(Turn), got {other:?}"),
        }
        let original = e.original_betting_round.as_ref().unwrap();
        assert_eq!(original.player_bet(&"a".to_string()), 100, "must include a's preflop call, not just the flop");
        assert_eq!(original.player_bet(&"b".to_string()), 100, "must include b's preflop check-level commitment");
        assert_eq!(original.player_bet(&"c".to_string()), 100, "must include c's preflop small blind and call");

        let turn = e.state.deck.burn_and_deal(1).unwrap();
        match e.apply_community_cards(Street::Turn, turn).unwrap() {
            RoundResolution::AwaitingAction => {}
            other => panic!("expected AwaitingAction, got {other:?}"),
        }
        let actor = e.betting_round.as_ref().unwrap().active_player().unwrap().clone();
        e.apply_action(&actor, Action::Check).unwrap();
        let actor = e.betting_round.as_ref().unwrap().active_player().unwrap().clone();
        e.apply_action(&actor, Action::Check).unwrap();
        match e.resolve_round_completion().unwrap() {
            RoundResolution::NeedsStreet(Street::River) => {}
            other => panic!("expected NeedsStreet(River), got {other:?}"),
        }

        let river = e.state.deck.burn_and_deal(1).unwrap();
        match e.apply_community_cards(Street::River, river).unwrap() {
            RoundResolution::AwaitingAction => {}
            other => panic!("expected AwaitingAction, got {other:?}"),
        }
        let actor = e.betting_round.as_ref().unwrap().active_player().unwrap().clone();
        e.apply_action(&actor, Action::Check).unwrap();
        let actor = e.betting_round.as_ref().unwrap().active_player().unwrap().clone();
        e.apply_action(&actor, Action::Check).unwrap();

        let awards = match e.resolve_round_completion().unwrap() {
            RoundResolution::Showdown(awards) => awards,
            other => panic!("expected Showdown, got {other:?}"),
        };

        let distributed: i64 = awards.iter().map(|a| a.pot_amount).sum();
        assert_eq!(distributed, 300, "the preflop pot must not vanish from the side-pot snapshot");
        let final_total: i64 = e.state.players.iter().map(|p| p.chips).sum();
        assert_eq!(final_total, starting_total, "chips must be conserved across the whole hand");
    }
}
