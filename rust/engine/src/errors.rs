use thiserror::Error;

use crate::event::GameEvent;
use crate::player::ActionKind;

/// How a caller should treat a [`GameError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad options; the hand never became playable.
    Fatal,
    /// The action is not legal right now. State is unchanged; re-prompt.
    InvalidAction,
    /// The call arrived in the wrong phase. State is unchanged.
    Protocol,
    /// The snapshot is corrupted or incompatible. Not retryable.
    Internal,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GameError {
    #[error("at least two players are required, got {0}")]
    InsufficientPlayers(usize),
    #[error("no seat holds the dealer position")]
    NoDealer,
    #[error("deck is empty")]
    EmptyDeck,
    #[error("deck has {available} cards, hand needs {needed}")]
    InsufficientCards { needed: usize, available: usize },
    #[error("player {seat} has a non-positive bankroll: {bankroll}")]
    InvalidBankroll { seat: usize, bankroll: i64 },
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("invalid card symbol: {0:?}")]
    InvalidCard(String),

    #[error("no player at seat {0}")]
    UnknownPlayer(usize),
    #[error("action {action} is not allowed for player {seat}")]
    InvalidAction { seat: usize, action: ActionKind },
    #[error("invalid raise to {level}, current wager is {current}")]
    InvalidRaise { level: i64, current: i64 },
    #[error("invalid bet amount: {amount}, minimum: {minimum}")]
    InvalidBetAmount { amount: i64, minimum: i64 },
    #[error("invalid payment: {actual}, expected {expected}")]
    InvalidPayment { expected: i64, actual: i64 },

    #[error("round is not closed (current event {0})")]
    RoundNotClosed(GameEvent),
    #[error("operation expects {expected}, hand is at {actual}")]
    UnexpectedPhase {
        expected: GameEvent,
        actual: GameEvent,
    },
    #[error("hand is closed")]
    GameClosed,

    #[error("unknown task: {0}")]
    UnknownTask(String),
    #[error("unknown round")]
    UnknownRound,
    #[error("inconsistent state: {0}")]
    Inconsistent(String),
}

impl GameError {
    pub fn class(&self) -> ErrorClass {
        use GameError::*;
        match self {
            InsufficientPlayers(_)
            | NoDealer
            | EmptyDeck
            | InsufficientCards { .. }
            | InvalidBankroll { .. }
            | InvalidOptions(_)
            | InvalidCard(_) => ErrorClass::Fatal,
            UnknownPlayer(_)
            | InvalidAction { .. }
            | InvalidRaise { .. }
            | InvalidBetAmount { .. }
            | InvalidPayment { .. } => ErrorClass::InvalidAction,
            RoundNotClosed(_) | UnexpectedPhase { .. } | GameClosed => ErrorClass::Protocol,
            UnknownTask(_) | UnknownRound | Inconsistent(_) => ErrorClass::Internal,
        }
    }

    /// Whether re-issuing a (different) call against the same snapshot can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GameError::GameClosed => false,
            e => matches!(e.class(), ErrorClass::InvalidAction | ErrorClass::Protocol),
        }
    }
}
