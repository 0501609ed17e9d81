use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{all_ranks, all_suits, Card, Rank};

/// All 52 cards in canonical order (suit-major).
pub fn standard_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card { suit: s, rank: r });
        }
    }
    v
}

/// The 36-card short deck: ranks Two through Five removed.
pub fn short_deck() -> Vec<Card> {
    standard_deck()
        .into_iter()
        .filter(|c| c.rank >= Rank::Six)
        .collect()
}

/// Shuffles `cards` with a ChaCha20 stream seeded from `seed`.
///
/// The same seed always yields the same order, which keeps hands replayable.
pub fn shuffled(mut cards: Vec<Card>, seed: u64) -> Vec<Card> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    cards.shuffle(&mut rng);
    cards
}
