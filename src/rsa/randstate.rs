// Seeded Random State
// One explicit generator per run, threaded by `&mut` through every
// operation that needs randomness.

use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint::{BigUint, RandBigInt};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Deterministic random source for primality testing and key generation.
///
/// Two states built from the same seed produce the same stream of draws, so
/// a whole key generation run is reproducible from its seed.
#[derive(Debug, Clone)]
pub struct RandState {
    rng: ChaCha20Rng,
    seed: u64,
}

impl RandState {
    /// Create a state seeded with `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a state seeded from the wall clock (seconds since the UNIX epoch)
    pub fn from_clock() -> Self {
        Self::new(clock_seed())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `[0, 2^bits)`
    pub fn random_bits(&mut self, bits: u64) -> BigUint {
        self.rng.gen_biguint(bits)
    }

    /// Uniform integer in `[0, bound)`; `bound` must be non-zero
    pub fn random_below(&mut self, bound: &BigUint) -> BigUint {
        self.rng.gen_biguint_below(bound)
    }

    /// Uniform integer in `[lo, hi]`; requires `lo <= hi`
    pub fn random_between(&mut self, lo: &BigUint, hi: &BigUint) -> BigUint {
        let upper = hi + 1u8;
        self.rng.gen_biguint_range(lo, &upper)
    }

    /// Uniform `u64` in `[lo, hi]`; requires `lo <= hi`
    pub fn random_u64_between(&mut self, lo: u64, hi: u64) -> u64 {
        self.rng.gen_range(lo..=hi)
    }
}

/// Seed used when none is supplied: current UNIX time in seconds
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = RandState::new(42);
        let mut b = RandState::new(42);

        for _ in 0..8 {
            assert_eq!(a.random_bits(200), b.random_bits(200));
        }
        assert_eq!(a.random_u64_between(10, 1000), b.random_u64_between(10, 1000));
    }

    #[test]
    fn test_different_seed_differs() {
        let mut a = RandState::new(1);
        let mut b = RandState::new(2);
        assert_ne!(a.random_bits(256), b.random_bits(256));
    }

    #[test]
    fn test_random_bits_bound() {
        let mut state = RandState::new(7);
        let bound = BigUint::from(1u8) << 20u32;
        for _ in 0..100 {
            assert!(state.random_bits(20) < bound);
        }
    }

    #[test]
    fn test_random_between_inclusive() {
        let mut state = RandState::new(9);
        let lo = BigUint::from(2u8);
        let hi = BigUint::from(3u8);
        let mut seen_hi = false;
        for _ in 0..200 {
            let x = state.random_between(&lo, &hi);
            assert!(x >= lo && x <= hi);
            seen_hi |= x == hi;
        }
        assert!(seen_hi);
    }

    #[test]
    fn test_random_below() {
        let mut state = RandState::new(3);
        let bound = BigUint::from(17u8);
        for _ in 0..100 {
            assert!(state.random_below(&bound) < bound);
        }
    }

    #[test]
    fn test_seed_is_kept() {
        assert_eq!(RandState::new(1234).seed(), 1234);
    }
}
