//! The hand state machine and action processor.
//!
//! A [`Game`] owns one [`GameState`]. Player-facing operations take a seat
//! index, validate against that seat's `allowed_actions`, mutate chips and
//! then drive phase transitions until the hand reaches a point where it
//! waits for the next external call (see [`GameEvent::is_waiting_point`]).
//!
//! Every public mutator is transactional: on error the state is restored
//! to the snapshot taken before the call.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::cards::Card;
use crate::combination::{evaluate_best, CombinationPowers};
use crate::deck::{short_deck, standard_deck};
use crate::errors::GameError;
use crate::event::{GameEvent, Round};
use crate::player::{ActionKind, LastAction, PlayerState, Position};
use crate::pot::{Pot, PotAccumulator};
use crate::rules::{self, BetLimit, BettingContext, ValidatedAction};
use crate::settlement::{settle, Entrant, SettlementResult};
use crate::task::{Task, TaskName, Tasks};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blind {
    pub dealer: i64,
    pub sb: i64,
    pub bb: i64,
}

impl Blind {
    pub fn any_positive(&self) -> bool {
        self.dealer > 0 || self.sb > 0 || self.bb > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetting {
    pub bankroll: i64,
    #[serde(default)]
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    pub ante: i64,
    pub blind: Blind,
    pub limit: BetLimit,
    pub hole_cards_count: usize,
    pub required_hole_cards_count: usize,
    pub combination_powers: CombinationPowers,
    pub deck: Vec<Card>,
    pub burn_count: usize,
    pub players: Vec<PlayerSetting>,
}

impl GameOptions {
    /// No-limit hold'em with 5/10 blinds, an unshuffled 52-card deck and no players.
    pub fn standard() -> Self {
        Self {
            ante: 0,
            blind: Blind {
                dealer: 0,
                sb: 5,
                bb: 10,
            },
            limit: BetLimit::No,
            hole_cards_count: 2,
            required_hole_cards_count: 0,
            combination_powers: CombinationPowers::standard(),
            deck: standard_deck(),
            burn_count: 1,
            players: Vec::new(),
        }
    }

    /// Short-deck hold'em: 36 cards, flush above full house.
    pub fn short_deck() -> Self {
        Self {
            combination_powers: CombinationPowers::short_deck(),
            deck: short_deck(),
            ..Self::standard()
        }
    }

    /// Seats `count` players with `bankroll` each and conventional positions.
    pub fn with_seats(mut self, count: usize, bankroll: i64) -> Self {
        self.players = (0..count)
            .map(|seat| PlayerSetting {
                bankroll,
                positions: default_positions(count, seat),
            })
            .collect();
        self
    }

    fn validate(&self) -> Result<(), GameError> {
        if self.players.len() < 2 {
            return Err(GameError::InsufficientPlayers(self.players.len()));
        }
        let dealers = self
            .players
            .iter()
            .filter(|p| p.positions.contains(&Position::Dealer))
            .count();
        match dealers {
            0 => return Err(GameError::NoDealer),
            1 => {}
            n => {
                return Err(GameError::InvalidOptions(format!(
                    "{n} seats hold the dealer position"
                )));
            }
        }
        if self.hole_cards_count == 0 {
            return Err(GameError::InvalidOptions("hole_cards_count must be at least 1".into()));
        }
        if self.required_hole_cards_count > self.hole_cards_count {
            return Err(GameError::InvalidOptions(
                "required_hole_cards_count exceeds hole_cards_count".into(),
            ));
        }
        if self.ante < 0 || self.blind.dealer < 0 || self.blind.sb < 0 || self.blind.bb < 0 {
            return Err(GameError::InvalidOptions("ante and blinds must be non-negative".into()));
        }
        if self.deck.is_empty() {
            return Err(GameError::EmptyDeck);
        }
        let needed = self.players.len() * self.hole_cards_count + 5 + 3 * self.burn_count;
        if self.deck.len() < needed {
            return Err(GameError::InsufficientCards {
                needed,
                available: self.deck.len(),
            });
        }
        if self.deck.iter().collect::<HashSet<_>>().len() != self.deck.len() {
            return Err(GameError::InvalidOptions("deck contains duplicate cards".into()));
        }
        for (seat, p) in self.players.iter().enumerate() {
            if p.bankroll <= 0 {
                return Err(GameError::InvalidBankroll {
                    seat,
                    bankroll: p.bankroll,
                });
            }
        }
        Ok(())
    }
}

impl Default for GameOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Conventional positions for `seat` at a table of `count`; seat 0 deals.
pub fn default_positions(count: usize, seat: usize) -> Vec<Position> {
    const REST: [Position; 4] = [Position::Ug, Position::Mp, Position::Hj, Position::Co];
    match (count, seat) {
        (2, 0) => vec![Position::Dealer, Position::Sb],
        (2, _) => vec![Position::Bb],
        (_, 0) => vec![Position::Dealer],
        (_, 1) => vec![Position::Sb],
        (_, 2) => vec![Position::Bb],
        (_, n) => vec![REST[(n - 3) % REST.len()]],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub ante: i64,
    pub blind: Blind,
    pub limit: BetLimit,
    pub hole_cards_count: usize,
    pub required_hole_cards_count: usize,
    pub combination_powers: CombinationPowers,
    pub deck: Vec<Card>,
    pub burn_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub current_event: GameEvent,
    pub current_round: Option<Round>,
    pub mini_bet: i64,
    pub current_wager: i64,
    pub previous_raise_size: i64,
    pub current_raiser: usize,
    pub current_player: usize,
    pub current_deck_position: usize,
    pub board: Vec<Card>,
    pub burned: Vec<Card>,
    pub pots: Vec<Pot>,
    pub last_action: Option<LastAction>,
    pub tasks: Tasks,
}

/// Serializable snapshot of one hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub meta: Meta,
    pub status: Status,
    pub players: Vec<PlayerState>,
    pub result: Option<SettlementResult>,
}

impl GameState {
    pub fn player(&self, seat: usize) -> Result<&PlayerState, GameError> {
        self.players.get(seat).ok_or(GameError::UnknownPlayer(seat))
    }

    pub fn dealer_seat(&self) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.has_position(Position::Dealer))
            .ok_or(GameError::NoDealer)
    }

    /// Sum of every pot level emitted so far.
    pub fn pot_total(&self) -> i64 {
        self.status.pots.iter().map(|p| p.total).sum()
    }

    /// Seats whose `allowed_actions` are non-empty, in seat order.
    pub fn actionable_seats(&self) -> Vec<usize> {
        self.players
            .iter()
            .filter(|p| !p.allowed_actions.is_empty())
            .map(|p| p.idx)
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.status.current_event == GameEvent::GameClosed
    }
}

pub struct Game {
    state: GameState,
}

impl Game {
    /// Validates `options` and builds a hand sitting at `Started`.
    pub fn new(options: GameOptions) -> Result<Self, GameError> {
        options.validate()?;
        let now = Utc::now().timestamp();
        let players = options
            .players
            .iter()
            .enumerate()
            .map(|(seat, p)| PlayerState::new(seat, p.bankroll, p.positions.clone()))
            .collect();
        let state = GameState {
            game_id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            meta: Meta {
                ante: options.ante,
                blind: options.blind,
                limit: options.limit,
                hole_cards_count: options.hole_cards_count,
                required_hole_cards_count: options.required_hole_cards_count,
                combination_powers: options.combination_powers,
                deck: options.deck,
                burn_count: options.burn_count,
            },
            status: Status {
                current_event: GameEvent::Started,
                current_round: None,
                mini_bet: 0,
                current_wager: 0,
                previous_raise_size: 0,
                current_raiser: 0,
                current_player: 0,
                current_deck_position: 0,
                board: Vec::new(),
                burned: Vec::new(),
                pots: Vec::new(),
                last_action: None,
                tasks: Tasks::new(),
            },
            players,
            result: None,
        };
        Ok(Self { state })
    }

    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn current_event(&self) -> GameEvent {
        self.state.status.current_event
    }

    /// Runs the hand from `Started` to its first waiting point.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.transact(|g| {
            g.expect_phase(GameEvent::Started)?;
            g.emit(GameEvent::Started)
        })
    }

    // ---- gating actions -------------------------------------------------

    pub fn ready(&mut self, seat: usize) -> Result<(), GameError> {
        self.transact(|g| {
            g.ensure_allowed(seat, ActionKind::Ready)?;
            let idx = g.gate_task_for(seat)?;
            g.task_mut(idx)?.mark_ready(seat)?;
            g.record(seat, ActionKind::Ready, 0);
            g.advance_tasks()?;
            Ok(())
        })
    }

    pub fn pay(&mut self, seat: usize, chips: i64) -> Result<(), GameError> {
        self.transact(|g| {
            g.ensure_allowed(seat, ActionKind::Pay)?;
            let idx = g.gate_task_for(seat)?;
            let task = g.task_mut(idx)?;
            task.record_payment(seat, chips)?;
            let name = task.name;
            let player = &mut g.state.players[seat];
            match name {
                TaskName::Ante => player.put_in_pot(chips),
                TaskName::DealerBlind | TaskName::SmallBlind | TaskName::BigBlind => {
                    player.put_in(chips)
                }
                TaskName::Ready => return Err(GameError::UnknownTask(name.as_str().into())),
            }
            g.record(seat, ActionKind::Pay, chips);
            g.advance_tasks()?;
            Ok(())
        })
    }

    /// Satisfies a gating entry for a seat that has nothing to give.
    pub fn pass(&mut self, seat: usize) -> Result<(), GameError> {
        self.transact(|g| {
            g.ensure_allowed(seat, ActionKind::Pass)?;
            let idx = g.gate_task_for(seat)?;
            g.task_mut(idx)?.waive(seat);
            g.record(seat, ActionKind::Pass, 0);
            g.advance_tasks()?;
            Ok(())
        })
    }

    /// Marks every seat ready (or passes it) during `ReadyRequested`.
    pub fn ready_for_all(&mut self) -> Result<(), GameError> {
        self.transact(|g| g.clear_gate(GameEvent::ReadyRequested))
    }

    /// Collects every ante during `AnteRequested`.
    pub fn pay_ante(&mut self) -> Result<(), GameError> {
        self.transact(|g| g.clear_gate(GameEvent::AnteRequested))
    }

    /// Collects every blind during `BlindsRequested`.
    pub fn pay_blinds(&mut self) -> Result<(), GameError> {
        self.transact(|g| g.clear_gate(GameEvent::BlindsRequested))
    }

    /// Chips `seat` owes the gating task it is currently asked to pay.
    pub fn owed_by(&self, seat: usize) -> Option<i64> {
        let idx = self.state.status.tasks.first_unsatisfied_for(seat)?;
        self.state.status.tasks.get(idx)?.owed_by(seat)
    }

    // ---- betting actions ------------------------------------------------

    pub fn fold(&mut self, seat: usize) -> Result<(), GameError> {
        self.transact(|g| {
            g.ensure_allowed(seat, ActionKind::Fold)?;
            g.apply(seat, ValidatedAction::Fold)
        })
    }

    pub fn check(&mut self, seat: usize) -> Result<(), GameError> {
        self.transact(|g| {
            g.ensure_allowed(seat, ActionKind::Check)?;
            g.apply(seat, ValidatedAction::Check)
        })
    }

    pub fn call(&mut self, seat: usize) -> Result<(), GameError> {
        self.transact(|g| {
            g.ensure_allowed(seat, ActionKind::Call)?;
            let action = rules::validate_call(&g.state.players[seat], &g.betting_context());
            g.apply(seat, action)
        })
    }

    pub fn bet(&mut self, seat: usize, chips: i64) -> Result<(), GameError> {
        self.transact(|g| {
            g.ensure_allowed(seat, ActionKind::Bet)?;
            let action = rules::validate_bet(&g.state.players[seat], &g.betting_context(), chips)?;
            g.apply(seat, action)
        })
    }

    /// Raises to the absolute wager `level`.
    pub fn raise(&mut self, seat: usize, level: i64) -> Result<(), GameError> {
        self.transact(|g| {
            g.ensure_allowed(seat, ActionKind::Raise)?;
            let action =
                rules::validate_raise(&g.state.players[seat], &g.betting_context(), level)?;
            g.apply(seat, action)
        })
    }

    pub fn allin(&mut self, seat: usize) -> Result<(), GameError> {
        self.transact(|g| {
            g.ensure_allowed(seat, ActionKind::Allin)?;
            let chips = g.state.players[seat].stack_size;
            g.apply(seat, ValidatedAction::AllIn(chips))
        })
    }

    /// Advances past a closed round into the next one.
    pub fn next(&mut self) -> Result<(), GameError> {
        self.transact(|g| {
            match g.current_event() {
                GameEvent::RoundClosed => {}
                GameEvent::GameClosed => return Err(GameError::GameClosed),
                other => return Err(GameError::RoundNotClosed(other)),
            }
            let round = g
                .state
                .status
                .current_round
                .and_then(Round::next)
                .ok_or(GameError::UnknownRound)?;
            g.emit(GameEvent::round_entered(round))
        })
    }

    // ---- internals ------------------------------------------------------

    fn transact<F>(&mut self, f: F) -> Result<(), GameError>
    where
        F: FnOnce(&mut Self) -> Result<(), GameError>,
    {
        let snapshot = self.state.clone();
        match f(self) {
            Ok(()) => {
                self.state.updated_at = Utc::now().timestamp();
                Ok(())
            }
            Err(err) => {
                debug!(game_id = %snapshot.game_id, error = %err, "call rejected, state restored");
                self.state = snapshot;
                Err(err)
            }
        }
    }

    fn expect_phase(&self, expected: GameEvent) -> Result<(), GameError> {
        match self.current_event() {
            actual if actual == expected => Ok(()),
            GameEvent::GameClosed => Err(GameError::GameClosed),
            actual => Err(GameError::UnexpectedPhase { expected, actual }),
        }
    }

    fn ensure_allowed(&self, seat: usize, action: ActionKind) -> Result<(), GameError> {
        if self.state.is_closed() {
            return Err(GameError::GameClosed);
        }
        let player = self.state.player(seat)?;
        if !player.is_allowed(action) {
            return Err(GameError::InvalidAction { seat, action });
        }
        Ok(())
    }

    fn betting_context(&self) -> BettingContext {
        let s = &self.state.status;
        BettingContext {
            current_wager: s.current_wager,
            previous_raise_size: s.previous_raise_size,
            min_bet: s.mini_bet,
            limit: self.state.meta.limit,
        }
    }

    fn record(&mut self, seat: usize, kind: ActionKind, value: i64) {
        debug!(game_id = %self.state.game_id, seat, action = %kind, value, "action applied");
        self.state.players[seat].did_action = Some(kind);
        self.state.status.last_action = Some(LastAction {
            source: seat,
            kind,
            value,
        });
    }

    fn gate_task_for(&self, seat: usize) -> Result<usize, GameError> {
        self.state
            .status
            .tasks
            .first_unsatisfied_for(seat)
            .ok_or_else(|| GameError::UnknownTask(format!("no pending task for seat {seat}")))
    }

    fn task_mut(&mut self, idx: usize) -> Result<&mut Task, GameError> {
        self.state
            .status
            .tasks
            .get_mut(idx)
            .ok_or_else(|| GameError::UnknownTask(format!("task #{idx}")))
    }

    /// Completes what it can of the task queue and moves on once it drains.
    /// Returns `true` once the open gate's queue has drained and the hand
    /// moved past it.
    fn advance_tasks(&mut self) -> Result<bool, GameError> {
        if !self.state.status.tasks.execute() {
            self.refresh_gate_actions();
            return Ok(false);
        }
        let next = match self.current_event() {
            GameEvent::ReadyRequested => GameEvent::Readiness,
            GameEvent::AnteRequested => GameEvent::AntePaid,
            GameEvent::BlindsRequested => GameEvent::BlindsPaid,
            other => return Err(GameError::UnknownTask(format!("no tasks expected at {other}"))),
        };
        self.state.status.tasks.clear();
        self.emit(next)?;
        Ok(true)
    }

    /// Offers each seat the action its first unsatisfied task needs.
    fn refresh_gate_actions(&mut self) {
        let tasks = &self.state.status.tasks;
        for player in &mut self.state.players {
            player.allowed_actions = match tasks.first_unsatisfied_for(player.idx) {
                None => Vec::new(),
                Some(_) if player.fold || player.is_all_in() => vec![ActionKind::Pass],
                Some(idx) => match tasks.get(idx) {
                    Some(task) if task.is_payment() => vec![ActionKind::Pay],
                    Some(_) => vec![ActionKind::Ready],
                    None => Vec::new(),
                },
            };
        }
    }

    /// Satisfies every entry of the gating phase `phase` on behalf of its seats.
    ///
    /// Stops once the queue open on entry drains, even when the hand comes
    /// back to another `phase` gate straight after.
    fn clear_gate(&mut self, phase: GameEvent) -> Result<(), GameError> {
        self.expect_phase(phase)?;
        loop {
            let seat = *self.state.actionable_seats().first().ok_or_else(|| {
                GameError::Inconsistent(format!("{phase} has no seat left to act"))
            })?;
            let idx = self.gate_task_for(seat)?;
            let actions = self.state.players[seat].allowed_actions.clone();
            let task = self.task_mut(idx)?;
            if actions.contains(&ActionKind::Pass) {
                task.waive(seat);
                self.record(seat, ActionKind::Pass, 0);
            } else if actions.contains(&ActionKind::Ready) {
                task.mark_ready(seat)?;
                self.record(seat, ActionKind::Ready, 0);
            } else {
                let chips = task.owed_by(seat).ok_or(GameError::UnknownPlayer(seat))?;
                task.record_payment(seat, chips)?;
                let name = task.name;
                match name {
                    TaskName::Ante => self.state.players[seat].put_in_pot(chips),
                    _ => self.state.players[seat].put_in(chips),
                }
                self.record(seat, ActionKind::Pay, chips);
            }
            if self.advance_tasks()? {
                return Ok(());
            }
        }
    }

    fn apply(&mut self, seat: usize, action: ValidatedAction) -> Result<(), GameError> {
        let status = &mut self.state.status;
        let player = &mut self.state.players[seat];
        match action {
            ValidatedAction::Fold => player.fold = true,
            ValidatedAction::Check => {}
            ValidatedAction::Call(chips) => player.put_in(chips),
            ValidatedAction::Bet(chips) | ValidatedAction::Raise(chips) => {
                player.put_in(chips);
                status.previous_raise_size = player.wager - status.current_wager;
                status.current_wager = player.wager;
                status.current_raiser = seat;
                reopen_betting(&mut self.state.players, seat);
            }
            ValidatedAction::AllIn(chips) => {
                player.put_in(chips);
                let increment = player.wager - status.current_wager;
                if increment > 0 {
                    status.current_wager = player.wager;
                    // a short all-in does not reopen betting
                    if increment >= status.previous_raise_size {
                        status.previous_raise_size = increment;
                        status.current_raiser = seat;
                        reopen_betting(&mut self.state.players, seat);
                    }
                }
            }
        }
        self.state.players[seat].acted = true;
        let value = match action {
            ValidatedAction::Raise(_) => self.state.players[seat].wager,
            other => other.chips(),
        };
        self.record(seat, action.kind(), value);
        self.advance_turn(seat)
    }

    fn advance_turn(&mut self, from: usize) -> Result<(), GameError> {
        let candidate = rules::next_movable(&self.state.players, from);
        if rules::round_is_closed(&self.state.players, self.state.status.current_wager, candidate) {
            return self.emit(GameEvent::RoundClosed);
        }
        let seat = candidate.ok_or_else(|| GameError::Inconsistent("no seat to act".into()))?;
        self.give_turn(seat);
        Ok(())
    }

    fn give_turn(&mut self, seat: usize) {
        let ctx = self.betting_context();
        self.state.status.current_player = seat;
        for player in &mut self.state.players {
            player.allowed_actions = if player.idx == seat {
                rules::allowed_actions(player, &ctx)
            } else {
                Vec::new()
            };
        }
    }

    fn emit(&mut self, first: GameEvent) -> Result<(), GameError> {
        let mut event = first;
        loop {
            self.state.status.current_event = event;
            debug!(
                game_id = %self.state.game_id,
                event = %event,
                round = ?self.state.status.current_round,
                "transition"
            );
            match self.on_event(event)? {
                Some(next) => event = next,
                None => return Ok(()),
            }
        }
    }

    /// Reacts to `event`; returns the follow-up event, or `None` to wait.
    fn on_event(&mut self, event: GameEvent) -> Result<Option<GameEvent>, GameError> {
        use GameEvent::*;
        let next = match event {
            Started => Some(Initialized),
            Initialized => {
                self.state.status.mini_bet = self.min_bet();
                self.state.status.previous_raise_size = self.state.status.mini_bet;
                self.state.status.current_raiser = self.state.dealer_seat()?;
                Some(ReadyRequested)
            }
            ReadyRequested => {
                let seats: Vec<usize> = self.state.players.iter().map(|p| p.idx).collect();
                self.open_gate(Task::ready(seats))?
            }
            Readiness => match self.state.status.current_round {
                None => Some(Prepared),
                Some(_) => Some(RoundPrepared),
            },
            Prepared => {
                self.deal_hole_cards()?;
                if self.state.meta.ante > 0 {
                    Some(AnteRequested)
                } else {
                    Some(PreflopRoundEntered)
                }
            }
            AnteRequested => {
                let owed = self.owed_map(|_| true, self.state.meta.ante);
                self.open_gate(Task::pay(TaskName::Ante, owed))?
            }
            AntePaid => {
                self.refresh_pots();
                Some(PreflopRoundEntered)
            }
            PreflopRoundEntered => {
                self.state.status.current_round = Some(Round::Preflop);
                Some(RoundInitialized)
            }
            FlopRoundEntered | TurnRoundEntered | RiverRoundEntered => {
                let round = match event {
                    FlopRoundEntered => Round::Flop,
                    TurnRoundEntered => Round::Turn,
                    _ => Round::River,
                };
                self.state.status.current_round = Some(round);
                self.burn_and_deal(round.board_cards())?;
                Some(RoundInitialized)
            }
            RoundInitialized => self.initialize_round()?,
            BlindsRequested => self.request_blinds()?,
            BlindsPaid => {
                let dealer = self.state.dealer_seat()?;
                let players = &self.state.players;
                let status = &mut self.state.status;
                status.current_wager = players.iter().map(|p| p.wager).max().unwrap_or(0);
                status.current_raiser = players
                    .iter()
                    .find(|p| p.has_position(Position::Bb) && p.wager > 0)
                    .map_or(dealer, |p| p.idx);
                Some(ReadyRequested)
            }
            RoundPrepared => {
                self.refresh_combinations();
                Some(RoundStarted)
            }
            RoundStarted => {
                self.state.status.tasks.clear();
                let raiser = self.state.status.current_raiser;
                let wager = self.state.status.current_wager;
                let candidate = rules::next_movable(&self.state.players, raiser);
                if rules::round_is_closed(&self.state.players, wager, candidate) {
                    Some(RoundClosed)
                } else {
                    let seat = candidate
                        .ok_or_else(|| GameError::Inconsistent("no seat to act".into()))?;
                    self.give_turn(seat);
                    None
                }
            }
            RoundClosed => {
                for player in &mut self.state.players {
                    player.collect_wager();
                    player.allowed_actions.clear();
                }
                self.state.status.current_wager = 0;
                self.refresh_pots();
                let unfolded = self.state.players.iter().filter(|p| !p.fold).count();
                if unfolded <= 1 || self.state.status.current_round == Some(Round::River) {
                    Some(GameCompleted)
                } else {
                    None
                }
            }
            GameCompleted => Some(SettlementRequested),
            SettlementRequested => {
                self.refresh_combinations();
                self.refresh_pots();
                self.settle()?;
                Some(SettlementCompleted)
            }
            SettlementCompleted => Some(GameClosed),
            GameClosed => {
                for player in &mut self.state.players {
                    player.allowed_actions.clear();
                }
                None
            }
        };
        Ok(next)
    }

    /// Registers `task` as the only gate and waits unless it is already done.
    fn open_gate(&mut self, task: Task) -> Result<Option<GameEvent>, GameError> {
        let tasks = &mut self.state.status.tasks;
        tasks.clear();
        tasks.register(task);
        self.gate_or_wait()
    }

    fn gate_or_wait(&mut self) -> Result<Option<GameEvent>, GameError> {
        if self.state.status.tasks.is_empty() {
            return Err(GameError::UnknownTask("gate opened without tasks".into()));
        }
        self.refresh_gate_actions();
        Ok(None)
    }

    /// Chips owed by each matching seat: `min(amount, stack)`.
    fn owed_map<F>(&self, include: F, amount: i64) -> BTreeMap<usize, i64>
    where
        F: Fn(&PlayerState) -> bool,
    {
        self.state
            .players
            .iter()
            .filter(|p| include(p))
            .map(|p| (p.idx, amount.min(p.stack_size)))
            .collect()
    }

    fn min_bet(&self) -> i64 {
        let meta = &self.state.meta;
        [meta.blind.bb, meta.blind.sb, meta.blind.dealer, meta.ante]
            .into_iter()
            .find(|&v| v > 0)
            .unwrap_or(1)
    }

    fn initialize_round(&mut self) -> Result<Option<GameEvent>, GameError> {
        let dealer = self.state.dealer_seat()?;
        for player in &mut self.state.players {
            player.reset_round();
        }
        let status = &mut self.state.status;
        status.current_wager = 0;
        status.previous_raise_size = status.mini_bet;
        status.current_raiser = dealer;

        if status.current_round != Some(Round::Preflop) {
            return Ok(Some(GameEvent::RoundPrepared));
        }
        let blind = self.state.meta.blind;
        if !blind.any_positive() {
            return Ok(Some(GameEvent::ReadyRequested));
        }
        if blind.dealer == 0 && blind.sb == 0 {
            // a lone big blind is posted without a wait-group task
            for player in &mut self.state.players {
                if player.has_position(Position::Bb) {
                    let chips = blind.bb.min(player.stack_size);
                    player.put_in(chips);
                }
            }
            return Ok(Some(GameEvent::BlindsPaid));
        }
        Ok(Some(GameEvent::BlindsRequested))
    }

    fn request_blinds(&mut self) -> Result<Option<GameEvent>, GameError> {
        let blind = self.state.meta.blind;
        let mut tasks = Tasks::new();
        for (name, position, amount) in [
            (TaskName::DealerBlind, Position::Dealer, blind.dealer),
            (TaskName::SmallBlind, Position::Sb, blind.sb),
            (TaskName::BigBlind, Position::Bb, blind.bb),
        ] {
            if amount <= 0 {
                continue;
            }
            let owed = self.owed_map(|p| p.has_position(position), amount);
            if !owed.is_empty() {
                tasks.register(Task::pay(name, owed));
            }
        }
        if tasks.is_empty() {
            return Ok(Some(GameEvent::BlindsPaid));
        }
        self.state.status.tasks = tasks;
        self.gate_or_wait()
    }

    fn draw(&mut self) -> Result<Card, GameError> {
        let pos = self.state.status.current_deck_position;
        let card = *self.state.meta.deck.get(pos).ok_or(GameError::InsufficientCards {
            needed: pos + 1,
            available: self.state.meta.deck.len(),
        })?;
        self.state.status.current_deck_position += 1;
        Ok(card)
    }

    /// Deals hole cards one at a time, starting left of the dealer.
    fn deal_hole_cards(&mut self) -> Result<(), GameError> {
        let dealer = self.state.dealer_seat()?;
        let n = self.state.players.len();
        for _ in 0..self.state.meta.hole_cards_count {
            for step in 1..=n {
                let card = self.draw()?;
                self.state.players[(dealer + step) % n].hole_cards.push(card);
            }
        }
        Ok(())
    }

    fn burn_and_deal(&mut self, count: usize) -> Result<(), GameError> {
        for _ in 0..self.state.meta.burn_count {
            let card = self.draw()?;
            self.state.status.burned.push(card);
        }
        for _ in 0..count {
            let card = self.draw()?;
            self.state.status.board.push(card);
        }
        Ok(())
    }

    fn refresh_combinations(&mut self) {
        let meta = &self.state.meta;
        let board = &self.state.status.board;
        for player in &mut self.state.players {
            player.combination = if player.fold {
                None
            } else {
                Some(evaluate_best(
                    &player.hole_cards,
                    board,
                    meta.required_hole_cards_count,
                    &meta.combination_powers,
                ))
            };
        }
    }

    fn refresh_pots(&mut self) {
        let mut acc = PotAccumulator::new();
        for player in &self.state.players {
            acc.contribute(player.idx, player.pot, player.fold);
        }
        self.state.status.pots = acc.pots();
    }

    fn settle(&mut self) -> Result<(), GameError> {
        let entrants: Vec<Entrant> = self
            .state
            .players
            .iter()
            .map(|p| Entrant {
                seat: p.idx,
                bankroll: p.bankroll,
                committed: p.committed(),
                score: p.combination.as_ref().map(|c| c.power),
            })
            .collect();
        let result = settle(&self.state.status.pots, &entrants)?;
        for pot in &result.pots {
            info!(
                game_id = %self.state.game_id,
                level = pot.level,
                total = pot.total,
                winners = ?pot.winners.iter().map(|w| w.idx).collect::<Vec<_>>(),
                "pot settled"
            );
        }
        self.state.result = Some(result);
        Ok(())
    }
}

/// Everyone else who can still act must act again.
fn reopen_betting(players: &mut [PlayerState], raiser: usize) {
    for p in players.iter_mut().filter(|p| p.idx != raiser && p.is_movable()) {
        p.acted = false;
    }
}
