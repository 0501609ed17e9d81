use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::pot::Pot;

/// A seat taking part in settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrant {
    pub seat: usize,
    /// Chips owned before the hand.
    pub bankroll: i64,
    /// Everything committed this hand (prior rounds plus current wager).
    pub committed: i64,
    /// Hand power, `None` when the seat folded.
    pub score: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub idx: usize,
    #[serde(rename = "final")]
    pub final_bankroll: i64,
    pub changed: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub idx: usize,
    pub withdraw: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotResult {
    pub level: i64,
    pub total: i64,
    pub winners: Vec<Winner>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub players: Vec<PlayerResult>,
    pub pots: Vec<PotResult>,
}

impl SettlementResult {
    pub fn withdrawn_by(&self, seat: usize) -> i64 {
        self.pots
            .iter()
            .flat_map(|p| p.winners.iter())
            .filter(|w| w.idx == seat)
            .map(|w| w.withdraw)
            .sum()
    }
}

/// Distributes every pot to its best-scoring eligible seats.
///
/// Ties split evenly; the `total % winners` leftover chips go one each to
/// the tied winners in seat order. A pot with no live contributor goes to
/// the best live entrant overall.
pub fn settle(pots: &[Pot], entrants: &[Entrant]) -> Result<SettlementResult, GameError> {
    let by_seat: BTreeMap<usize, &Entrant> = entrants.iter().map(|e| (e.seat, e)).collect();
    let mut withdrawals: BTreeMap<usize, i64> = BTreeMap::new();
    let mut pot_results = Vec::with_capacity(pots.len());

    for pot in pots {
        let eligible: Vec<&Entrant> = if pot.contributors.is_empty() {
            entrants.iter().filter(|e| e.score.is_some()).collect()
        } else {
            pot.contributors
                .iter()
                .map(|seat| {
                    by_seat.get(seat).copied().ok_or_else(|| {
                        GameError::Inconsistent(format!("pot contributor {seat} has no entrant"))
                    })
                })
                .collect::<Result<_, _>>()?
        };

        let winners = top_tier(&eligible);
        if winners.is_empty() {
            return Err(GameError::Inconsistent(format!(
                "pot at level {} has no eligible winner",
                pot.level
            )));
        }

        let share = pot.total / winners.len() as i64;
        let remainder = (pot.total % winners.len() as i64) as usize;
        let paid: Vec<Winner> = winners
            .iter()
            .enumerate()
            .map(|(i, &seat)| Winner {
                idx: seat,
                withdraw: share + i64::from(i < remainder),
            })
            .collect();
        for w in &paid {
            *withdrawals.entry(w.idx).or_default() += w.withdraw;
        }
        pot_results.push(PotResult {
            level: pot.level,
            total: pot.total,
            winners: paid,
        });
    }

    let players = entrants
        .iter()
        .map(|e| {
            let final_bankroll =
                e.bankroll - e.committed + withdrawals.get(&e.seat).copied().unwrap_or(0);
            PlayerResult {
                idx: e.seat,
                final_bankroll,
                changed: final_bankroll - e.bankroll,
            }
        })
        .collect();

    Ok(SettlementResult {
        players,
        pots: pot_results,
    })
}

/// Seats sharing the highest score, in ascending seat order.
fn top_tier(eligible: &[&Entrant]) -> Vec<usize> {
    let Some(best) = eligible.iter().filter_map(|e| e.score).max() else {
        return Vec::new();
    };
    let mut seats: Vec<usize> = eligible
        .iter()
        .filter(|e| e.score == Some(best))
        .map(|e| e.seat)
        .collect();
    seats.sort_unstable();
    seats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrant(seat: usize, committed: i64, score: Option<u64>) -> Entrant {
        Entrant {
            seat,
            bankroll: 10_000,
            committed,
            score,
        }
    }

    #[test]
    fn odd_chip_goes_to_first_tied_winner() {
        let pots = vec![Pot {
            level: 1111,
            wager: 1111,
            total: 3333,
            contributors: vec![0, 1, 2],
        }];
        let entrants = vec![
            entrant(0, 1111, Some(900)),
            entrant(1, 1111, Some(900)),
            entrant(2, 1111, Some(100)),
        ];
        let result = settle(&pots, &entrants).unwrap();
        let finals: Vec<i64> = result.players.iter().map(|p| p.final_bankroll).collect();
        assert_eq!(finals, vec![10_556, 10_555, 8_889]);
        assert_eq!(result.pots[0].winners[0].withdraw, 1667);
        assert_eq!(result.pots[0].winners[1].withdraw, 1666);
        assert_eq!(result.players.iter().map(|p| p.changed).sum::<i64>(), 0);
    }

    #[test]
    fn side_pot_goes_to_covering_seat() {
        let pots = vec![
            Pot {
                level: 500,
                wager: 500,
                total: 1500,
                contributors: vec![0, 1, 2],
            },
            Pot {
                level: 1000,
                wager: 500,
                total: 1000,
                contributors: vec![1, 2],
            },
        ];
        let entrants = vec![
            entrant(0, 500, Some(50)),
            entrant(1, 1000, Some(40)),
            entrant(2, 1000, Some(10)),
        ];
        let result = settle(&pots, &entrants).unwrap();
        assert_eq!(result.withdrawn_by(0), 1500);
        assert_eq!(result.withdrawn_by(1), 1000);
        assert_eq!(result.players[2].changed, -1000);
    }

    #[test]
    fn unknown_contributor_is_inconsistent() {
        let pots = vec![Pot {
            level: 10,
            wager: 10,
            total: 10,
            contributors: vec![7],
        }];
        let err = settle(&pots, &[entrant(0, 10, Some(1))]).unwrap_err();
        assert!(matches!(err, GameError::Inconsistent(_)));
    }
}
