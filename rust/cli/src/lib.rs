//! # Holdem CLI Library
//!
//! Command-line harness over the `holdem_engine` snapshot backend. The
//! primary entry point is [`run`], which parses arguments and dispatches to
//! a subcommand handler.
//!
//! ## Available Subcommands
//!
//! - `cfg`: Display the resolved configuration and each value's source
//! - `deal`: Deal a hand and print the preflop snapshot
//! - `eval`: Evaluate the best hand in a set of cards
//! - `play`: Play one hand from a script of actions
//!
//! ## Example Usage
//!
//! ```
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! let code = holdem_cli::run(["holdem", "eval", "--cards", "SA SK SQ SJ ST"], &mut out, &mut err);
//! assert_eq!(code, 0);
//! assert!(String::from_utf8(out).unwrap().contains("StraightFlush"));
//! ```

use clap::Parser;
use std::io::Write;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod logging;
pub mod ui;

use cli::{Commands, HoldemCli, COMMANDS};
use commands::{handle_cfg_command, handle_deal_command, handle_eval_command, handle_play_command};

pub use commands::{parse_script, ScriptAction, ScriptLine};
pub use error::CliError;

/// Parses `args` and runs the selected command.
///
/// Returns [`exit_code::SUCCESS`] or [`exit_code::ERROR`]. Help and version
/// output go to `out`; usage errors and command failures go to `err`.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match HoldemCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_usage(e, out, err),
    };

    let is_cfg = matches!(cli.cmd, Commands::Cfg);
    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Deal { seed } => handle_deal_command(seed, out),
        Commands::Eval { cards, short_deck } => handle_eval_command(&cards, short_deck, out),
        Commands::Play { script, seed, log } => {
            handle_play_command(&script, seed, log.as_deref(), out, err)
        }
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        // cfg reports its own configuration errors
        Err(CliError::Config(_)) if is_cfg => exit_code::ERROR,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn report_usage(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }
    let _ = writeln!(err, "{}", e);
    let _ = writeln!(err, "Usage: holdem <command> [options]\n");
    let _ = writeln!(err, "Commands:");
    for c in COMMANDS {
        let _ = writeln!(err, "  {}", c);
    }
    let _ = writeln!(err, "\nFor full help, run: holdem --help");
    exit_code::ERROR
}
