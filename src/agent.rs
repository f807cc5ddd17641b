//! # Opponent Strategies
//!
//! The opponent is abstracted behind the `OpponentStrategy` trait so the
//! controller never cares how a reply is picked. The only strategy shipped
//! here is `RandomStrategy`: a uniform choice over the legal move list, no
//! weighting, no search, no evaluation.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use shakmaty::Move;

/// Capability: given the legal moves, pick one.
///
/// Returning `None` means there is nothing to play (the game is over by the
/// engine's own rules).
pub trait OpponentStrategy: Send {
    fn choose(&mut self, legal: &[Move]) -> Option<Move>;
}

/// Picks uniformly at random among all legal moves.
pub struct RandomStrategy {
    rng: Xoshiro256PlusPlus,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_entropy(),
        }
    }

    /// Fixed RNG stream, for reproducible games and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl OpponentStrategy for RandomStrategy {
    fn choose(&mut self, legal: &[Move]) -> Option<Move> {
        if legal.is_empty() {
            return None;
        }
        Some(legal[self.rng.gen_range(0..legal.len())].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GameSession;

    #[test]
    fn empty_move_list_yields_none() {
        let mut strategy = RandomStrategy::seeded(1);
        assert_eq!(strategy.choose(&[]), None);
    }

    #[test]
    fn seeded_choice_is_reproducible() {
        let session = GameSession::new();
        let legal = session.legal_moves();
        let mut a = RandomStrategy::seeded(42);
        let mut b = RandomStrategy::seeded(42);
        for _ in 0..50 {
            assert_eq!(a.choose(&legal), b.choose(&legal));
        }
    }

    #[test]
    fn every_legal_move_is_eventually_chosen() {
        // Distribution check over the 20 opening moves: with 2000 uniform
        // draws the odds of missing any single move are negligible.
        let session = GameSession::new();
        let legal = session.legal_moves();
        assert_eq!(legal.len(), 20);

        let mut strategy = RandomStrategy::seeded(7);
        let mut counts = vec![0u32; legal.len()];
        for _ in 0..2000 {
            let chosen = strategy.choose(&legal).unwrap();
            let idx = legal.iter().position(|m| *m == chosen).unwrap();
            counts[idx] += 1;
        }
        assert!(counts.iter().all(|&c| c > 0), "counts: {counts:?}");
    }
}
