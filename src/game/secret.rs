//! Secret number generation.
//!
//! The session asks a [`SecretSource`] for one number per game so tests can
//! swap the thread RNG for a fixed or seeded source.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Smallest secret a game can pick (inclusive).
pub const SECRET_MIN: i32 = 1;
/// Largest secret a game can pick (inclusive).
pub const SECRET_MAX: i32 = 100;

/// Produces the secret number for a new round.
pub trait SecretSource {
    fn next_secret(&mut self) -> i32;
}

/// Uniform draw over `SECRET_MIN..=SECRET_MAX` from any RNG.
#[derive(Debug, Clone)]
pub struct RandomSecret<R> {
    rng: R,
}

impl RandomSecret<ThreadRng> {
    pub fn thread() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl RandomSecret<StdRng> {
    /// Reproducible source for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> SecretSource for RandomSecret<R> {
    fn next_secret(&mut self) -> i32 {
        self.rng.gen_range(SECRET_MIN..=SECRET_MAX)
    }
}

/// Always yields the same secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSecret(pub i32);

impl SecretSource for FixedSecret {
    fn next_secret(&mut self) -> i32 {
        self.0
    }
}
