use crate::errors::GameError;
use crate::game::{Game, GameOptions, GameState};

/// Snapshot-in, snapshot-out backend over [`Game`].
///
/// Each call clones the given state, applies one operation and returns the
/// new snapshot; the input is never touched, so callers can keep it for
/// rollback or diffing. Callers serialize access to a hand.
///
/// # Examples
///
/// ```
/// use holdem_engine::engine::Engine;
/// use holdem_engine::event::GameEvent;
/// use holdem_engine::game::GameOptions;
///
/// let engine = Engine::new();
/// let state = engine.create_game(GameOptions::standard().with_seats(2, 1_000)).unwrap();
/// assert_eq!(state.status.current_event, GameEvent::ReadyRequested);
///
/// let state = engine.ready_for_all(&state).unwrap();
/// let state = engine.pay_blinds(&state).unwrap();
/// let state = engine.ready_for_all(&state).unwrap();
/// assert_eq!(state.status.current_event, GameEvent::RoundStarted);
/// assert_eq!(state.players[0].hole_cards.len(), 2);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Engine
    }

    /// Validates `options` and runs the new hand to its first waiting point.
    pub fn create_game(&self, options: GameOptions) -> Result<GameState, GameError> {
        let mut game = Game::new(options)?;
        game.start()?;
        Ok(game.into_state())
    }

    pub fn ready_for_all(&self, state: &GameState) -> Result<GameState, GameError> {
        self.apply(state, Game::ready_for_all)
    }

    pub fn pay_ante(&self, state: &GameState) -> Result<GameState, GameError> {
        self.apply(state, Game::pay_ante)
    }

    pub fn pay_blinds(&self, state: &GameState) -> Result<GameState, GameError> {
        self.apply(state, Game::pay_blinds)
    }

    pub fn next(&self, state: &GameState) -> Result<GameState, GameError> {
        self.apply(state, Game::next)
    }

    pub fn pass(&self, state: &GameState, seat: usize) -> Result<GameState, GameError> {
        self.apply(state, |g| g.pass(seat))
    }

    pub fn ready(&self, state: &GameState, seat: usize) -> Result<GameState, GameError> {
        self.apply(state, |g| g.ready(seat))
    }

    pub fn pay(&self, state: &GameState, seat: usize, chips: i64) -> Result<GameState, GameError> {
        self.apply(state, |g| g.pay(seat, chips))
    }

    pub fn fold(&self, state: &GameState, seat: usize) -> Result<GameState, GameError> {
        self.apply(state, |g| g.fold(seat))
    }

    pub fn check(&self, state: &GameState, seat: usize) -> Result<GameState, GameError> {
        self.apply(state, |g| g.check(seat))
    }

    pub fn call(&self, state: &GameState, seat: usize) -> Result<GameState, GameError> {
        self.apply(state, |g| g.call(seat))
    }

    pub fn allin(&self, state: &GameState, seat: usize) -> Result<GameState, GameError> {
        self.apply(state, |g| g.allin(seat))
    }

    pub fn bet(&self, state: &GameState, seat: usize, chips: i64) -> Result<GameState, GameError> {
        self.apply(state, |g| g.bet(seat, chips))
    }

    pub fn raise(
        &self,
        state: &GameState,
        seat: usize,
        level: i64,
    ) -> Result<GameState, GameError> {
        self.apply(state, |g| g.raise(seat, level))
    }

    fn apply<F>(&self, state: &GameState, op: F) -> Result<GameState, GameError>
    where
        F: FnOnce(&mut Game) -> Result<(), GameError>,
    {
        let mut game = Game::from_state(state.clone());
        op(&mut game)?;
        Ok(game.into_state())
    }
}
