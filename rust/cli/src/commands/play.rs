//! Scripted play of a single hand.
//!
//! A script holds one action per line, applied in order to whichever seat
//! the engine says is to act:
//!
//! ```text
//! # preflop
//! call
//! check
//! bet 20
//! raise 60
//! fold
//! ```
//!
//! Blank lines and `#` comments are skipped. Gating phases never appear in
//! a script; they are cleared with the engine shortcuts.

use crate::commands::{advance, resolve_seed};
use crate::config;
use crate::error::CliError;
use crate::ui;
use holdem_engine::engine::Engine;
use holdem_engine::errors::GameError;
use holdem_engine::game::GameState;
use holdem_engine::logger::HandLogger;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptAction {
    Check,
    Call,
    Fold,
    AllIn,
    Bet(i64),
    /// Raise to this total wager.
    Raise(i64),
}

impl fmt::Display for ScriptAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptAction::Check => f.write_str("check"),
            ScriptAction::Call => f.write_str("call"),
            ScriptAction::Fold => f.write_str("fold"),
            ScriptAction::AllIn => f.write_str("allin"),
            ScriptAction::Bet(n) => write!(f, "bet {}", n),
            ScriptAction::Raise(n) => write!(f, "raise {}", n),
        }
    }
}

/// A parsed action and the 1-based script line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub action: ScriptAction,
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>, CliError> {
    let mut lines = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let action = parse_action(content)
            .map_err(|msg| CliError::InvalidInput(format!("line {}: {}", i + 1, msg)))?;
        lines.push(ScriptLine {
            line: i + 1,
            action,
        });
    }
    Ok(lines)
}

fn parse_action(content: &str) -> Result<ScriptAction, String> {
    let mut words = content.split_whitespace();
    let verb = words.next().unwrap_or("").to_ascii_lowercase();
    let amount = words.next();
    if words.next().is_some() {
        return Err(format!("unexpected trailing input in '{}'", content));
    }
    let action = match (verb.as_str(), amount) {
        ("check", None) => ScriptAction::Check,
        ("call", None) => ScriptAction::Call,
        ("fold", None) => ScriptAction::Fold,
        ("allin", None) | ("all-in", None) => ScriptAction::AllIn,
        ("bet", Some(n)) => ScriptAction::Bet(parse_amount(n)?),
        ("raise", Some(n)) => ScriptAction::Raise(parse_amount(n)?),
        ("bet", None) | ("raise", None) => return Err(format!("'{}' needs an amount", verb)),
        _ => return Err(format!("unrecognized action '{}'", content)),
    };
    Ok(action)
}

fn parse_amount(raw: &str) -> Result<i64, String> {
    raw.parse()
        .map_err(|_| format!("invalid amount '{}'", raw))
}

fn apply(
    engine: &Engine,
    state: &GameState,
    seat: usize,
    action: ScriptAction,
) -> Result<GameState, GameError> {
    match action {
        ScriptAction::Check => engine.check(state, seat),
        ScriptAction::Call => engine.call(state, seat),
        ScriptAction::Fold => engine.fold(state, seat),
        ScriptAction::AllIn => engine.allin(state, seat),
        ScriptAction::Bet(chips) => engine.bet(state, seat, chips),
        ScriptAction::Raise(level) => engine.raise(state, seat, level),
    }
}

/// Plays one hand from `script` and prints the settlement result as JSON.
pub fn handle_play_command(
    script: &Path,
    seed: Option<u64>,
    log: Option<&Path>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let text = fs::read_to_string(script)?;
    let lines = parse_script(&text)?;
    let cfg = config::load().map_err(|e| CliError::Config(e.to_string()))?;
    let seed = resolve_seed(seed, cfg.seed);
    let mut logger = match log {
        Some(path) => HandLogger::create(path)?,
        None => HandLogger::discard(),
    };

    let engine = Engine::new();
    let mut state = advance(&engine, engine.create_game(cfg.to_options(seed))?)?;
    logger.log_state(&state)?;
    tracing::debug!(game_id = %state.game_id, seed, actions = lines.len(), "playing script");

    for (i, step) in lines.iter().enumerate() {
        if state.is_closed() {
            ui::display_warning(
                err,
                &format!(
                    "hand closed before line {}; ignoring {} remaining action(s)",
                    step.line,
                    lines.len() - i
                ),
            )?;
            break;
        }
        let seat = state.status.current_player;
        let next = match apply(&engine, &state, seat, step.action) {
            Ok(next) => next,
            Err(e) => {
                ui::write_error(
                    err,
                    &format!("line {}: seat {} cannot {}", step.line, seat, step.action),
                )?;
                return Err(e.into());
            }
        };
        state = advance(&engine, next)?;
        logger.log_state(&state)?;
    }

    let result = state.result.as_ref().ok_or_else(|| {
        CliError::InvalidInput(format!(
            "script ended before the hand closed; seat {} is to act in {}",
            state.status.current_player, state.status.current_event
        ))
    })?;
    ui::write_json(out, result)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions_comments_and_blank_lines() {
        let script = "# preflop\ncall\n\n  CHECK  \nbet 20 # value\nraise 60\nall-in\nfold\n";
        let lines = parse_script(script).unwrap();
        let actions: Vec<ScriptAction> = lines.iter().map(|l| l.action).collect();
        assert_eq!(
            actions,
            vec![
                ScriptAction::Call,
                ScriptAction::Check,
                ScriptAction::Bet(20),
                ScriptAction::Raise(60),
                ScriptAction::AllIn,
                ScriptAction::Fold,
            ]
        );
        assert_eq!(lines[0].line, 2);
        assert_eq!(lines[1].line, 4);
    }

    #[test]
    fn reports_the_offending_line() {
        for (script, needle) in [
            ("call\nraise\n", "line 2"),
            ("bet x\n", "invalid amount"),
            ("dance\n", "unrecognized"),
            ("check 5\n", "unrecognized"),
            ("bet 5 10\n", "trailing"),
        ] {
            match parse_script(script) {
                Err(CliError::InvalidInput(msg)) => assert!(msg.contains(needle), "{msg}"),
                other => panic!("{script:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn display_round_trips_through_the_parser() {
        for action in [ScriptAction::Bet(15), ScriptAction::Raise(40), ScriptAction::AllIn] {
            assert_eq!(parse_action(&action.to_string()).unwrap(), action);
        }
    }
}
