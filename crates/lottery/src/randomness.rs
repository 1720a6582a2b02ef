//! Deterministic seeded draws
//!
//! Each draw derives a fresh 32-byte seed as
//! `BLAKE3("LOTTERY_DRAW" || seed || counter)` and feeds it to `StdRng`, so
//! replaying the same seed reproduces the same sequence of draws.

use crate::ports::Randomness;
use crate::types::TicketNumber;
use anyhow::{bail, Result};
use blake3::Hasher;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};

const DRAW_DOMAIN: &[u8] = b"LOTTERY_DRAW";

#[derive(Debug)]
pub struct SeededRandomness {
    seed: [u8; 32],
    draws: AtomicU64,
}

impl SeededRandomness {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            seed,
            draws: AtomicU64::new(0),
        }
    }

    /// Number of draws served so far
    pub fn draw_count(&self) -> u64 {
        self.draws.load(Ordering::SeqCst)
    }

    fn rng_for(&self, counter: u64) -> StdRng {
        let mut hasher = Hasher::new();
        hasher.update(DRAW_DOMAIN);
        hasher.update(&self.seed);
        hasher.update(&counter.to_le_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }
}

impl Randomness for SeededRandomness {
    fn draw(&self, count: usize, upper: TicketNumber) -> Result<Vec<TicketNumber>> {
        if upper == 0 {
            bail!("cannot draw from an empty ticket range");
        }
        let counter = self.draws.fetch_add(1, Ordering::SeqCst);
        let mut rng = self.rng_for(counter);
        Ok((0..count).map(|_| rng.gen_range(0..upper)).collect())
    }
}
