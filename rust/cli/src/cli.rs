//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "holdem",
    version,
    about = "Inspect and play single poker hands with the holdem engine"
)]
pub struct HoldemCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolved configuration and where each value came from
    Cfg,
    /// Deal a hand and print the preflop snapshot as JSON
    Deal {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Evaluate the best hand in a set of cards
    Eval {
        /// Card symbols, suit then rank, e.g. "SA SK SQ SJ ST"
        #[arg(long)]
        cards: String,
        #[arg(long)]
        short_deck: bool,
    },
    /// Play one hand from a script of actions
    Play {
        /// One action per line: check, call, fold, allin, bet N, raise N
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        /// Append a JSONL record per applied action
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

pub const COMMANDS: &[&str] = &["cfg", "deal", "eval", "play"];
