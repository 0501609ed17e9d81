use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One pot level: the chips staked between the previous threshold and `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    /// Cumulative per-player stake at the top of this level.
    pub level: i64,
    /// Marginal per-player stake this level covers.
    pub wager: i64,
    pub total: i64,
    /// Unfolded seats that reached `level`; the seats eligible to win it.
    pub contributors: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Contribution {
    amount: i64,
    folded: bool,
}

/// Builds pot levels from every seat's cumulative contribution.
///
/// Levels are re-derived from the full contribution map on each call to
/// [`PotAccumulator::pots`], so feeding the same amounts twice is a no-op.
#[derive(Debug, Clone, Default)]
pub struct PotAccumulator {
    contributions: BTreeMap<usize, Contribution>,
}

impl PotAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `seat`'s cumulative stake. Later calls for the same seat replace it.
    pub fn contribute(&mut self, seat: usize, amount: i64, folded: bool) {
        if amount <= 0 {
            self.contributions.remove(&seat);
            return;
        }
        self.contributions.insert(seat, Contribution { amount, folded });
    }

    pub fn total(&self) -> i64 {
        self.contributions.values().map(|c| c.amount).sum()
    }

    /// Splits the contributions into levels, one per distinct stake.
    ///
    /// Adjacent levels merge only when the same seats, folded ones included,
    /// reached both. `contributors` keeps just the unfolded seats, so a level
    /// reached only by folded seats has none.
    pub fn pots(&self) -> Vec<Pot> {
        let mut thresholds: Vec<i64> = self.contributions.values().map(|c| c.amount).collect();
        thresholds.sort_unstable();
        thresholds.dedup();

        let mut out: Vec<Pot> = Vec::new();
        let mut last_reached: Vec<usize> = Vec::new();
        let mut floor = 0;
        for level in thresholds {
            let wager = level - floor;
            floor = level;
            let reached: Vec<usize> = self
                .contributions
                .iter()
                .filter(|(_, c)| c.amount >= level)
                .map(|(&seat, _)| seat)
                .collect();
            let total = wager * reached.len() as i64;

            match out.last_mut() {
                Some(last) if last_reached == reached => {
                    last.level = level;
                    last.wager += wager;
                    last.total += total;
                }
                _ => out.push(Pot {
                    level,
                    wager,
                    total,
                    contributors: reached
                        .iter()
                        .copied()
                        .filter(|seat| !self.contributions[seat].folded)
                        .collect(),
                }),
            }
            last_reached = reached;
        }
        out
    }
}
