use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::{ActionKind as A, PlayerState};

/// Betting limit mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetLimit {
    /// No limit.
    #[default]
    No,
    /// Bets and raises are capped at `current_wager + previous_raise_size`.
    Pot,
}

/// Betting state of the round the acting player faces.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BettingContext {
    pub current_wager: i64,
    pub previous_raise_size: i64,
    pub min_bet: i64,
    pub limit: BetLimit,
}

/// An action after legality checks, carrying the chips it moves from the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    Call(i64),
    Bet(i64),
    Raise(i64),
    AllIn(i64),
}

impl ValidatedAction {
    pub fn kind(self) -> A {
        match self {
            ValidatedAction::Fold => A::Fold,
            ValidatedAction::Check => A::Check,
            ValidatedAction::Call(_) => A::Call,
            ValidatedAction::Bet(_) => A::Bet,
            ValidatedAction::Raise(_) => A::Raise,
            ValidatedAction::AllIn(_) => A::Allin,
        }
    }

    pub fn chips(self) -> i64 {
        match self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call(c)
            | ValidatedAction::Bet(c)
            | ValidatedAction::Raise(c)
            | ValidatedAction::AllIn(c) => c,
        }
    }
}

/// Actions offered to `player` when it is their turn in a betting round.
pub fn allowed_actions(player: &PlayerState, ctx: &BettingContext) -> Vec<A> {
    if player.fold || player.is_all_in() {
        return vec![A::Pass];
    }
    if player.wager < ctx.current_wager {
        let mut actions = vec![A::Allin, A::Fold, A::Call];
        if player.stack_size + player.wager > ctx.current_wager + ctx.previous_raise_size {
            actions.push(A::Raise);
        }
        actions
    } else {
        let mut actions = vec![A::Allin, A::Check];
        if ctx.current_wager == 0 {
            if player.stack_size >= ctx.min_bet {
                actions.push(A::Bet);
            }
        } else if player.stack_size > ctx.previous_raise_size {
            actions.push(A::Raise);
        }
        actions
    }
}

/// A call for less than the full amount is an all-in.
pub fn validate_call(player: &PlayerState, ctx: &BettingContext) -> ValidatedAction {
    let to_call = (ctx.current_wager - player.wager).max(0);
    if player.stack_size <= to_call {
        ValidatedAction::AllIn(player.stack_size)
    } else {
        ValidatedAction::Call(to_call)
    }
}

/// Validates an opening bet of `chips`.
///
/// ```
/// use holdem_engine::player::PlayerState;
/// use holdem_engine::rules::{validate_bet, BetLimit, BettingContext, ValidatedAction};
///
/// let ctx = BettingContext {
///     current_wager: 0,
///     previous_raise_size: 10,
///     min_bet: 10,
///     limit: BetLimit::No,
/// };
/// let player = PlayerState::new(0, 50, vec![]);
/// assert_eq!(validate_bet(&player, &ctx, 20).unwrap(), ValidatedAction::Bet(20));
/// assert_eq!(validate_bet(&player, &ctx, 80).unwrap(), ValidatedAction::AllIn(50));
/// assert!(validate_bet(&player, &ctx, 5).is_err());
/// ```
pub fn validate_bet(
    player: &PlayerState,
    ctx: &BettingContext,
    chips: i64,
) -> Result<ValidatedAction, GameError> {
    if chips <= 0 {
        return Err(GameError::InvalidBetAmount {
            amount: chips,
            minimum: ctx.min_bet,
        });
    }
    let chips = match ctx.limit {
        BetLimit::No => chips,
        BetLimit::Pot => chips.min(ctx.current_wager + ctx.previous_raise_size),
    };
    if chips >= player.stack_size {
        return Ok(ValidatedAction::AllIn(player.stack_size));
    }
    if chips < ctx.min_bet {
        return Err(GameError::InvalidBetAmount {
            amount: chips,
            minimum: ctx.min_bet,
        });
    }
    Ok(ValidatedAction::Bet(chips))
}

/// Validates a raise to the absolute wager `level`.
///
/// A raise smaller than the previous increment cannot stand as a raise and
/// is converted to an all-in, as is any raise the stack cannot cover.
///
/// ```
/// use holdem_engine::player::PlayerState;
/// use holdem_engine::rules::{validate_raise, BetLimit, BettingContext, ValidatedAction};
///
/// let ctx = BettingContext {
///     current_wager: 100,
///     previous_raise_size: 100,
///     min_bet: 10,
///     limit: BetLimit::No,
/// };
/// let player = PlayerState::new(0, 1_000, vec![]);
/// assert_eq!(validate_raise(&player, &ctx, 300).unwrap(), ValidatedAction::Raise(300));
/// assert_eq!(validate_raise(&player, &ctx, 150).unwrap(), ValidatedAction::AllIn(1_000));
/// ```
pub fn validate_raise(
    player: &PlayerState,
    ctx: &BettingContext,
    level: i64,
) -> Result<ValidatedAction, GameError> {
    if level <= 0 || level < ctx.current_wager {
        return Err(GameError::InvalidRaise {
            level,
            current: ctx.current_wager,
        });
    }
    let level = match ctx.limit {
        BetLimit::No => level,
        BetLimit::Pot => level.min(ctx.current_wager + ctx.previous_raise_size),
    };
    if level == ctx.current_wager {
        return Ok(if player.wager >= ctx.current_wager {
            ValidatedAction::Check
        } else {
            validate_call(player, ctx)
        });
    }
    if level >= player.stack_size + player.wager
        || level - ctx.current_wager < ctx.previous_raise_size
    {
        return Ok(ValidatedAction::AllIn(player.stack_size));
    }
    Ok(ValidatedAction::Raise(level - player.wager))
}

/// First seat after `from` (cyclic, `from` itself last) that can still act.
pub fn next_movable(players: &[PlayerState], from: usize) -> Option<usize> {
    let n = players.len();
    (1..=n)
        .map(|step| (from + step) % n)
        .find(|&seat| players[seat].is_movable())
}

/// Whether the betting round is over, given the next seat in turn order.
pub fn round_is_closed(
    players: &[PlayerState],
    current_wager: i64,
    candidate: Option<usize>,
) -> bool {
    let unfolded = players.iter().filter(|p| !p.fold).count();
    if unfolded <= 1 {
        return true;
    }
    let movable: Vec<&PlayerState> = players.iter().filter(|p| p.is_movable()).collect();
    match movable.as_slice() {
        [] => return true,
        [only] if only.wager >= current_wager => return true,
        _ => {}
    }
    match candidate {
        Some(seat) => {
            let p = &players[seat];
            p.acted && p.wager >= current_wager
        }
        None => true,
    }
}
