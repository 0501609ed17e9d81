//! Hand-strength evaluation.
//!
//! Every category owns a disjoint block ("slot") of the score space:
//!
//! | category                      | slot  |
//! |-------------------------------|-------|
//! | high card, flush              | 13^5  |
//! | pair                          | 13^4  |
//! | two pair, three of a kind     | 13^3  |
//! | full house, four of a kind    | 13^2  |
//! | straight, straight flush      | 13^1  |
//!
//! Within a slot a hand scores `sum((rank - 2) * 13^position)` over its
//! defining ranks, most significant first. Straights score `top - 5`, so the
//! ace-low wheel scores 0. The final power adds the sizes of every slot that
//! ranks below the hand's category in the active [`CombinationPowers`], so
//! scores never collide across categories and always respect the ordering.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::errors::GameError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::HighCard,
        Category::Pair,
        Category::TwoPair,
        Category::ThreeOfAKind,
        Category::Straight,
        Category::Flush,
        Category::FullHouse,
        Category::FourOfAKind,
        Category::StraightFlush,
    ];

    /// Number of base-13 digits a hand of this category scores with.
    fn digits(self) -> u32 {
        match self {
            Category::HighCard | Category::Flush => 5,
            Category::Pair => 4,
            Category::TwoPair | Category::ThreeOfAKind => 3,
            Category::FullHouse | Category::FourOfAKind => 2,
            Category::Straight | Category::StraightFlush => 1,
        }
    }

    pub fn slot_size(self) -> u64 {
        13u64.pow(self.digits())
    }
}

/// Category ordering, strongest first, with per-category score offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct CombinationPowers {
    order: Vec<Category>,
    offsets: [u64; 9],
}

impl CombinationPowers {
    pub fn new(order: Vec<Category>) -> Result<Self, GameError> {
        if order.len() != Category::ALL.len()
            || Category::ALL.iter().any(|c| !order.contains(c))
        {
            return Err(GameError::InvalidOptions(
                "combination powers must list every category exactly once".into(),
            ));
        }
        let offsets = slot_offsets(&order);
        Ok(Self { order, offsets })
    }

    pub fn standard() -> Self {
        Self::from_const(&[
            Category::StraightFlush,
            Category::FourOfAKind,
            Category::FullHouse,
            Category::Flush,
            Category::Straight,
            Category::ThreeOfAKind,
            Category::TwoPair,
            Category::Pair,
            Category::HighCard,
        ])
    }

    /// Short-deck ordering: a flush beats a full house.
    pub fn short_deck() -> Self {
        Self::from_const(&[
            Category::StraightFlush,
            Category::FourOfAKind,
            Category::Flush,
            Category::FullHouse,
            Category::Straight,
            Category::ThreeOfAKind,
            Category::TwoPair,
            Category::Pair,
            Category::HighCard,
        ])
    }

    fn from_const(order: &[Category; 9]) -> Self {
        Self {
            order: order.to_vec(),
            offsets: slot_offsets(order),
        }
    }

    pub fn order(&self) -> &[Category] {
        &self.order
    }

    pub fn offset(&self, category: Category) -> u64 {
        self.offsets[category as usize]
    }
}

/// Offset of each category: the summed slot sizes of everything weaker.
fn slot_offsets(order: &[Category]) -> [u64; 9] {
    let mut offsets = [0u64; 9];
    let mut base = 0u64;
    for &category in order.iter().rev() {
        offsets[category as usize] = base;
        base += category.slot_size();
    }
    offsets
}

impl Default for CombinationPowers {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<Category>> for CombinationPowers {
    type Error = GameError;

    fn try_from(order: Vec<Category>) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<CombinationPowers> for Vec<Category> {
    fn from(powers: CombinationPowers) -> Self {
        powers.order
    }
}

/// A scored hand: its category, contributing cards and total-ordered power.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    #[serde(rename = "type")]
    pub category: Category,
    pub cards: Vec<Card>,
    pub power: u64,
}

/// Scores up to five cards as a single hand.
///
/// Fewer than five cards classify only by rank multiplicity (no flush or
/// straight), which is what live odds need before the board is complete.
pub fn evaluate(cards: &[Card], powers: &CombinationPowers) -> Combination {
    let mut sorted = cards.to_vec();
    sorted.sort_by(|a, b| b.rank.cmp(&a.rank));

    // Histogram in first-appearance order (descending rank), then a stable
    // sort by count. Equal-count groups keep histogram order.
    let mut groups: Vec<(Rank, Vec<Card>)> = Vec::new();
    for card in &sorted {
        match groups.iter_mut().find(|(rank, _)| *rank == card.rank) {
            Some((_, members)) => members.push(*card),
            None => groups.push((card.rank, vec![*card])),
        }
    }
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let counts: Vec<usize> = groups.iter().map(|(_, m)| m.len()).collect();
    let mut category = match counts.as_slice() {
        [4, ..] => Category::FourOfAKind,
        [3, 2, ..] => Category::FullHouse,
        [3, ..] => Category::ThreeOfAKind,
        [2, 2, ..] => Category::TwoPair,
        [2, ..] => Category::Pair,
        _ => Category::HighCard,
    };

    if sorted.len() == 5 && category == Category::HighCard {
        let flush = sorted.iter().all(|c| c.suit == sorted[0].suit);
        let straight = straight_top(&sorted);
        category = match (straight, flush) {
            (Some(_), true) => Category::StraightFlush,
            (Some(_), false) => Category::Straight,
            (None, true) => Category::Flush,
            (None, false) => Category::HighCard,
        };
        if let Some(top) = straight {
            let mut ordered = sorted.clone();
            if top == 5 {
                // wheel: the ace plays low
                ordered.rotate_left(1);
            }
            let within = u64::from(top) - 5;
            return Combination {
                category,
                cards: ordered,
                power: powers.offset(category) + within,
            };
        }
    }

    let digits = category.digits();
    let within: u64 = groups
        .iter()
        .take(digits as usize)
        .enumerate()
        .map(|(i, (rank, _))| u64::from(rank.value() - 2) * 13u64.pow(digits - 1 - i as u32))
        .sum();

    Combination {
        category,
        cards: groups.into_iter().flat_map(|(_, m)| m).collect(),
        power: powers.offset(category) + within,
    }
}

/// Top rank of a five-card straight, `5` for the ace-low wheel.
fn straight_top(sorted_desc: &[Card]) -> Option<u8> {
    let values: Vec<u8> = sorted_desc.iter().map(|c| c.rank.value()).collect();
    let distinct = values.windows(2).all(|w| w[0] != w[1]);
    if !distinct {
        return None;
    }
    if values[0] - values[4] == 4 {
        return Some(values[0]);
    }
    if values == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

/// Best combination from hole and board cards.
///
/// With `required_hole > 0` exactly that many hole cards are used (Omaha
/// style); otherwise any five of the pooled cards. When too few cards are
/// known for a full hand, the available cards are scored as a partial hand.
pub fn evaluate_best(
    hole: &[Card],
    board: &[Card],
    required_hole: usize,
    powers: &CombinationPowers,
) -> Combination {
    let candidates: Vec<Vec<Card>> = if required_hole == 0 {
        let pool: Vec<Card> = hole.iter().chain(board.iter()).copied().collect();
        if pool.len() <= 5 {
            vec![pool]
        } else {
            combinations(&pool, 5)
        }
    } else {
        let from_hole = required_hole.min(hole.len());
        let from_board = 5 - from_hole.min(5);
        let hole_sets = combinations(hole, from_hole);
        let board_sets = if board.len() <= from_board {
            vec![board.to_vec()]
        } else {
            combinations(board, from_board)
        };
        hole_sets
            .iter()
            .flat_map(|h| {
                board_sets.iter().map(move |b| {
                    let mut set = h.clone();
                    set.extend_from_slice(b);
                    set
                })
            })
            .collect()
    };

    let mut best: Option<Combination> = None;
    for set in candidates {
        let scored = evaluate(&set, powers);
        match &best {
            Some(b) if b.power >= scored.power => {}
            _ => best = Some(scored),
        }
    }
    best.unwrap_or_else(|| evaluate(&[], powers))
}

/// All `k`-subsets of `items`, preserving input order inside each subset.
pub fn combinations(items: &[Card], k: usize) -> Vec<Vec<Card>> {
    let mut out = Vec::new();
    if k > items.len() {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.iter().map(|&i| items[i]).collect());
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if idx[i] != i + items.len() - k {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
