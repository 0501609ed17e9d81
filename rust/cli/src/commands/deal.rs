//! Deal command: one hand run up to its first betting decision.

use crate::commands::{advance, resolve_seed};
use crate::config;
use crate::error::CliError;
use crate::ui;
use holdem_engine::engine::Engine;
use std::io::Write;

/// Creates a hand from the resolved configuration, clears the readiness,
/// ante and blind phases and prints the preflop snapshot as JSON.
pub fn handle_deal_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let cfg = config::load().map_err(|e| CliError::Config(e.to_string()))?;
    let seed = resolve_seed(seed, cfg.seed);
    tracing::debug!(seed, "dealing");

    let engine = Engine::new();
    let state = engine.create_game(cfg.to_options(seed))?;
    let state = advance(&engine, state)?;
    ui::write_json(out, &state)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_engine::game::GameState;
    use serial_test::serial;

    fn deal(seed: u64) -> GameState {
        let mut out = Vec::new();
        handle_deal_command(Some(seed), &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    #[serial]
    fn test_deal_stops_at_the_first_decision() {
        let state = deal(42);
        assert_eq!(state.status.current_event.as_str(), "RoundStarted");
        assert!(state.players.iter().all(|p| p.hole_cards.len() == 2));
        assert!(state.status.board.is_empty());
    }

    #[test]
    #[serial]
    fn test_deal_is_deterministic_per_seed() {
        let a = deal(12345);
        let b = deal(12345);
        assert_ne!(a.game_id, b.game_id);
        for (pa, pb) in a.players.iter().zip(&b.players) {
            assert_eq!(pa.hole_cards, pb.hole_cards);
        }
    }
}
