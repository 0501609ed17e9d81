use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::combination::Combination;

/// A table position. A seat may hold several (heads-up dealer is also small blind).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Dealer,
    Sb,
    Bb,
    /// Under the gun
    Ug,
    /// Middle position
    Mp,
    /// Hijack
    Hj,
    /// Cutoff
    Co,
}

/// Player-facing actions, as offered in [`PlayerState::allowed_actions`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Pass,
    Ready,
    Pay,
    Check,
    Call,
    Fold,
    Bet,
    Raise,
    Allin,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Pass => "pass",
            ActionKind::Ready => "ready",
            ActionKind::Pay => "pay",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Fold => "fold",
            ActionKind::Bet => "bet",
            ActionKind::Raise => "raise",
            ActionKind::Allin => "allin",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The most recent applied action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAction {
    pub source: usize,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub value: i64,
}

/// One seat's state for the hand. Seat index is the position in `GameState::players`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub idx: usize,
    pub positions: Vec<Position>,
    /// Chips owned before the hand; constant until settlement.
    pub bankroll: i64,
    /// Stack at the start of the current round.
    pub initial_stack_size: i64,
    pub stack_size: i64,
    /// Committed in previous rounds (and antes).
    pub pot: i64,
    /// Committed in the current round.
    pub wager: i64,
    pub fold: bool,
    /// Acted since the last bet or raise.
    pub acted: bool,
    /// The last action this seat took this round.
    pub did_action: Option<ActionKind>,
    pub allowed_actions: Vec<ActionKind>,
    pub hole_cards: Vec<Card>,
    pub combination: Option<Combination>,
}

impl PlayerState {
    pub fn new(idx: usize, bankroll: i64, positions: Vec<Position>) -> Self {
        Self {
            idx,
            positions,
            bankroll,
            initial_stack_size: bankroll,
            stack_size: bankroll,
            pot: 0,
            wager: 0,
            fold: false,
            acted: false,
            did_action: None,
            allowed_actions: Vec::new(),
            hole_cards: Vec::new(),
            combination: None,
        }
    }

    pub fn has_position(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    pub fn is_allowed(&self, action: ActionKind) -> bool {
        self.allowed_actions.contains(&action)
    }

    /// Still able to act: not folded and chips behind.
    pub fn is_movable(&self) -> bool {
        !self.fold && self.stack_size > 0
    }

    /// Still in the hand with nothing left behind.
    pub fn is_all_in(&self) -> bool {
        !self.fold && self.stack_size == 0
    }

    /// Total committed this hand.
    pub fn committed(&self) -> i64 {
        self.pot + self.wager
    }

    /// Moves chips from the stack into the current-round wager.
    pub(crate) fn put_in(&mut self, chips: i64) {
        self.stack_size -= chips;
        self.wager += chips;
    }

    /// Moves chips from the stack straight into the pot (antes).
    pub(crate) fn put_in_pot(&mut self, chips: i64) {
        self.stack_size -= chips;
        self.pot += chips;
    }

    /// Closes the round for this seat: wager moves into the pot.
    pub(crate) fn collect_wager(&mut self) {
        self.pot += self.wager;
        self.wager = 0;
    }

    pub(crate) fn reset_round(&mut self) {
        self.initial_stack_size = self.stack_size;
        self.acted = false;
        self.did_action = None;
        self.allowed_actions.clear();
    }

    pub fn chips_balanced(&self) -> bool {
        self.bankroll == self.stack_size + self.wager + self.pot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chip_moves_keep_bankroll_balanced() {
        let mut p = PlayerState::new(0, 100, vec![Position::Dealer]);
        p.put_in_pot(5);
        p.put_in(20);
        assert!(p.chips_balanced());
        p.collect_wager();
        assert_eq!((p.stack_size, p.wager, p.pot), (75, 0, 25));
        assert!(p.chips_balanced());
    }

    #[test]
    fn all_in_means_live_with_an_empty_stack() {
        let mut p = PlayerState::new(1, 50, vec![]);
        assert!(p.is_movable() && !p.is_all_in());
        p.put_in(50);
        assert!(p.is_all_in() && !p.is_movable());
        p.fold = true;
        assert!(!p.is_all_in());
    }

    #[test]
    fn tokens_are_lowercase() {
        assert_eq!(serde_json::to_string(&ActionKind::Allin).unwrap(), "\"allin\"");
        assert_eq!(serde_json::to_string(&Position::Bb).unwrap(), "\"bb\"");
        assert_eq!(ActionKind::Raise.to_string(), "raise");
    }
}
