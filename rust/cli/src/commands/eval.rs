//! Hand evaluation command.

use crate::error::CliError;
use crate::ui;
use holdem_engine::cards::{parse_cards, Card, Rank};
use holdem_engine::combination::{evaluate_best, Combination, CombinationPowers};
use std::collections::HashSet;
use std::io::Write;

/// Most cards a hold'em player can see: two hole cards and the board.
const MAX_CARDS: usize = 7;

/// Prints the category, best five cards and power of `cards`.
pub fn handle_eval_command(
    cards: &str,
    short_deck: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let cards = parse_cards(cards).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let best = evaluate_cards(&cards, short_deck)?;
    let display = serde_json::json!({
        "category": best.category,
        "cards": best.cards,
        "power": best.power,
    });
    ui::write_json(out, &display)?;
    Ok(())
}

fn evaluate_cards(cards: &[Card], short_deck: bool) -> Result<Combination, CliError> {
    if cards.is_empty() || cards.len() > MAX_CARDS {
        return Err(CliError::InvalidInput(format!(
            "expected 1 to {} cards, got {}",
            MAX_CARDS,
            cards.len()
        )));
    }
    if cards.iter().collect::<HashSet<_>>().len() != cards.len() {
        return Err(CliError::InvalidInput("duplicate card".into()));
    }
    let powers = if short_deck {
        if let Some(card) = cards.iter().find(|c| c.rank < Rank::Six) {
            return Err(CliError::InvalidInput(format!(
                "{} is not in the short deck",
                card.symbol()
            )));
        }
        CombinationPowers::short_deck()
    } else {
        CombinationPowers::standard()
    };
    Ok(evaluate_best(&[], cards, 0, &powers))
}
