//! # holdem-engine: single-hand poker rules engine
//!
//! Drives one hand of Texas Hold'em (or short-deck hold'em) through its
//! phases, validates every player action, builds side pots as players
//! commit unequal amounts, ranks each player's best combination and settles
//! the pots with exact chip accounting.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation and two-character card symbols
//! - [`deck`] - Standard and short decks, seeded ChaCha20 shuffling
//! - [`combination`] - Hand-strength evaluation under a configurable category ordering
//! - [`pot`] - Pot levels and side pots from cumulative contributions
//! - [`settlement`] - Pot distribution with remainder-safe splits
//! - [`task`] - Wait-group tasks gating the ready, ante and blind phases
//! - [`event`] - Phase events and betting rounds
//! - [`player`] - Per-seat state and action kinds
//! - [`rules`] - Allowed actions, bet/raise validation and turn order
//! - [`game`] - The hand state machine and action processor
//! - [`engine`] - Snapshot-in, snapshot-out backend
//! - [`logger`] - JSONL hand history
//! - [`errors`] - Error taxonomy
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::combination::{evaluate_best, Category, CombinationPowers};
//!
//! let hole = parse_cards("HA HK").unwrap();
//! let board = parse_cards("HQ HJ HT C2 D3").unwrap();
//! let best = evaluate_best(&hole, &board, 0, &CombinationPowers::standard());
//! assert_eq!(best.category, Category::StraightFlush);
//! ```
//!
//! ## Playing a hand
//!
//! ```rust
//! use holdem_engine::deck::{shuffled, standard_deck};
//! use holdem_engine::event::GameEvent;
//! use holdem_engine::game::{Game, GameOptions};
//!
//! let mut options = GameOptions::standard().with_seats(2, 1_000);
//! options.deck = shuffled(standard_deck(), 42);
//! let mut game = Game::new(options).unwrap();
//! game.start().unwrap();
//! game.ready_for_all().unwrap();
//! game.pay_blinds().unwrap();
//! game.ready_for_all().unwrap();
//!
//! // heads-up: the dealer acts first preflop and folds
//! game.fold(0).unwrap();
//! assert_eq!(game.current_event(), GameEvent::GameClosed);
//! let result = game.state().result.as_ref().unwrap();
//! assert_eq!(result.players[1].changed, 5);
//! ```

pub mod cards;
pub mod combination;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod event;
pub mod game;
pub mod logger;
pub mod player;
pub mod pot;
pub mod rules;
pub mod settlement;
pub mod task;
