//! Per-session random streams.
//!
//! Each session gets its own ChaCha8 generator. With a configured master seed
//! the stream for the n-th session is reproducible across runs.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct SessionRngFactory {
    master_seed: u64,
    issued: AtomicU64,
}

impl SessionRngFactory {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            master_seed: seed.unwrap_or_else(rand::random),
            issued: AtomicU64::new(0),
        }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Hands out the generator for the next session.
    pub fn next_stream(&self) -> ChaCha8Rng {
        let ordinal = self.issued.fetch_add(1, Ordering::Relaxed);
        ChaCha8Rng::seed_from_u64(derive_seed(self.master_seed, ordinal))
    }
}

fn derive_seed(master_seed: u64, ordinal: u64) -> u64 {
    let mut seed = master_seed;
    seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    seed ^= ordinal.wrapping_mul(48271);
    seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_streams() {
        let a = SessionRngFactory::new(Some(42));
        let b = SessionRngFactory::new(Some(42));

        let val_a: f64 = a.next_stream().gen();
        let val_b: f64 = b.next_stream().gen();

        assert_eq!(val_a, val_b, "Same seed should produce same values");
    }

    #[test]
    fn sessions_get_distinct_streams() {
        let factory = SessionRngFactory::new(Some(42));

        let first: f64 = factory.next_stream().gen();
        let second: f64 = factory.next_stream().gen();

        assert_ne!(first, second);
    }

    #[test]
    fn unseeded_factory_still_works() {
        let factory = SessionRngFactory::new(None);
        let value: f64 = factory.next_stream().gen_range(-1.0..=1.0);
        assert!((-1.0..=1.0).contains(&value));
    }
}
