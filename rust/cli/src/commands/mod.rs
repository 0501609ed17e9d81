//! Command handlers, one module per subcommand.
//!
//! Each handler takes its output streams as `&mut dyn Write` and returns
//! `Result<(), CliError>`; [`crate::run`] turns errors into exit codes.

mod cfg;
mod deal;
mod eval;
mod play;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use play::{handle_play_command, parse_script, ScriptAction, ScriptLine};

use holdem_engine::engine::Engine;
use holdem_engine::errors::GameError;
use holdem_engine::event::GameEvent;
use holdem_engine::game::GameState;

use crate::error::CliError;

/// Clears gating phases with the engine shortcuts and moves closed rounds
/// on with `next()`, stopping where a player has to act or the hand is over.
pub(crate) fn advance(engine: &Engine, mut state: GameState) -> Result<GameState, CliError> {
    loop {
        state = match state.status.current_event {
            GameEvent::ReadyRequested => engine.ready_for_all(&state)?,
            GameEvent::AnteRequested => engine.pay_ante(&state)?,
            GameEvent::BlindsRequested => engine.pay_blinds(&state)?,
            GameEvent::RoundClosed => engine.next(&state)?,
            event if event.is_waiting_point() => return Ok(state),
            event => {
                return Err(GameError::Inconsistent(format!(
                    "snapshot rests at {event}, which is not a waiting point"
                ))
                .into());
            }
        };
    }
}

/// The CLI's seed if given, else the configured one, else a random seed.
pub(crate) fn resolve_seed(cli: Option<u64>, configured: Option<u64>) -> u64 {
    cli.or(configured).unwrap_or_else(rand::random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_engine::game::{Blind, GameOptions};

    #[test]
    fn advance_clears_both_readiness_gates_without_blinds() {
        let engine = Engine::new();
        let mut options = GameOptions::standard().with_seats(2, 1_000);
        options.blind = Blind::default();
        let state = engine.create_game(options).unwrap();
        let state = advance(&engine, state).unwrap();
        assert_eq!(state.status.current_event, GameEvent::RoundStarted);
        assert!(state.players.iter().all(|p| p.wager == 0));
    }

    #[test]
    fn advance_rejects_a_snapshot_between_waiting_points() {
        let engine = Engine::new();
        let mut state = engine
            .create_game(GameOptions::standard().with_seats(2, 1_000))
            .unwrap();
        state.status.current_event = GameEvent::RoundPrepared;
        let err = advance(&engine, state).unwrap_err();
        assert!(matches!(err, CliError::Engine(GameError::Inconsistent(_))), "{err}");
    }
}
