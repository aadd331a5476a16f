//! Generated id suffixes
//!
//! Report and scenario ids carry a short suffix. The suffix source is a seam
//! so that simulations can be made byte-for-byte reproducible.

use parking_lot::Mutex;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};

/// Length of random suffixes
const SUFFIX_LEN: usize = 6;

/// Source of id suffixes
pub trait IdSource: Send + Sync + std::fmt::Debug {
    /// Next suffix; callers must not assume any format beyond "non-empty"
    fn next_suffix(&self) -> String;
}

/// Thread-local RNG suffixes
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_suffix(&self) -> String {
        random_suffix(&mut rand::thread_rng())
    }
}

/// Reproducible random suffixes from a seed
#[derive(Debug)]
pub struct SeededIdSource {
    rng: Mutex<StdRng>,
}

impl SeededIdSource {
    /// Create source seeded with `seed`
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IdSource for SeededIdSource {
    fn next_suffix(&self) -> String {
        random_suffix(&mut *self.rng.lock())
    }
}

/// Monotonic counter suffixes (`0001`, `0002`, ...)
#[derive(Debug, Default)]
pub struct SequentialIdSource {
    next: AtomicU64,
}

impl SequentialIdSource {
    /// Create counter starting at 1
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIdSource {
    fn next_suffix(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{n:04}")
    }
}

fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}
