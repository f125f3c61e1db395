//! Seeded random source underlying every generator draw.
//!
//! All randomness in a run flows through a single [`RandomSource`] built from
//! one [`Seed`]; rebuilding a source from the same seed replays the exact
//! draw stream.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Root value a reproducible random stream is derived from.
pub type Seed = i64;

const SEED_STRIDE: i64 = 0x9E37_79B9_7F4A_7C15_u64 as i64;

static SEED_COUNTER: AtomicI64 = AtomicI64::new(0);

/// Returns a seed that varies from call to call.
///
/// Used when no explicit seed is supplied. Failures report the seed that was
/// picked, so any run can be replayed exactly by passing it back in.
pub fn fresh_seed() -> Seed {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as i64)
        .unwrap_or(0);
    nanos ^ SEED_COUNTER.fetch_add(SEED_STRIDE, Ordering::Relaxed)
}

/// Deterministic pseudo-random source with 256 bits of internal state.
///
/// Every draw advances the state, so consecutive draws differ even when the
/// request is the same. Two sources built from the same seed produce
/// identical draw streams.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    draws: u64,
}

impl RandomSource {
    pub fn new(seed: Seed) -> RandomSource {
        RandomSource {
            rng: ChaCha8Rng::seed_from_u64(seed as u64),
            draws: 0,
        }
    }

    /// Number of draws taken from this source so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.rng.gen()
    }

    /// Uniform draw from the unit interval `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.draws += 1;
        self.rng.gen()
    }

    /// Weighted boolean draw: `true` with probability `p`.
    ///
    /// `p <= 0.0` always yields `false` and `p >= 1.0` always yields `true`;
    /// the draw is consumed either way.
    pub fn next_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform draw from `min..=max`.
    pub fn next_i64_in(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "empty range {min}..={max}");
        self.draws += 1;
        self.rng.gen_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn same_seed_replays_the_same_stream() {
        let mut first = RandomSource::new(42);
        let mut second = RandomSource::new(42);
        for _ in 0..200 {
            assert_eq!(first.next_u64(), second.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut first = RandomSource::new(0);
        let mut second = RandomSource::new(1);
        let left: Vec<u64> = (0..16).map(|_| first.next_u64()).collect();
        let right: Vec<u64> = (0..16).map(|_| second.next_u64()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn every_draw_advances_the_state() {
        let mut source = RandomSource::new(7);
        let first = source.next_u64();
        let second = source.next_u64();
        assert_ne!(first, second);
        assert_eq!(source.draws(), 2);
    }

    #[test]
    fn bool_draw_edge_probabilities() {
        let mut source = RandomSource::new(3);
        for _ in 0..100 {
            assert!(!source.next_bool(0.0));
            assert!(source.next_bool(1.0));
        }
        assert!(!source.next_bool(-0.5));
        assert!(source.next_bool(1.5));
    }

    #[test]
    fn bool_draw_consumes_state() {
        let mut source = RandomSource::new(3);
        let before = source.draws();
        source.next_bool(0.0);
        assert_eq!(source.draws(), before + 1);
    }

    #[test]
    fn range_draw_respects_bounds() {
        let mut source = RandomSource::new(11);
        for _ in 0..500 {
            let value = source.next_i64_in(-5, 17);
            assert!((-5..=17).contains(&value));
        }
    }

    #[test]
    fn degenerate_range_is_constant() {
        let mut source = RandomSource::new(11);
        for _ in 0..10 {
            assert_eq!(source.next_i64_in(9, 9), 9);
        }
    }

    #[test]
    fn fresh_seeds_vary() {
        let seeds: HashSet<Seed> = (0..64).map(|_| fresh_seed()).collect();
        assert_eq!(seeds.len(), 64);
    }
}
