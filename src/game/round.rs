//! State machine for a single guessing round.

use crate::storage::GameStats;
use thiserror::Error;

/// Classification of one guess against the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    TooSmall,
    TooBig,
    Win,
}

impl Verdict {
    /// Line shown to the player for this verdict.
    pub fn message(self) -> &'static str {
        match self {
            Verdict::TooSmall => "Too small!",
            Verdict::TooBig => "Too big!",
            Verdict::Win => "You win!",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("round already won; no further guesses accepted")]
    Finished,
}

/// One round: a fixed secret plus every guess made so far.
#[derive(Debug, Clone)]
pub struct Round {
    secret: i32,
    attempts: Vec<i32>,
    won: bool,
}

impl Round {
    pub fn new(secret: i32) -> Self {
        Self {
            secret,
            attempts: Vec::new(),
            won: false,
        }
    }

    pub fn secret(&self) -> i32 {
        self.secret
    }

    pub fn attempts(&self) -> &[i32] {
        &self.attempts
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Record `guess` and classify it. Every accepted guess is recorded,
    /// including repeats and the winning one.
    pub fn guess(&mut self, guess: i32) -> Result<Verdict, RoundError> {
        if self.won {
            return Err(RoundError::Finished);
        }
        self.attempts.push(guess);
        let verdict = match guess.cmp(&self.secret) {
            std::cmp::Ordering::Less => Verdict::TooSmall,
            std::cmp::Ordering::Greater => Verdict::TooBig,
            std::cmp::Ordering::Equal => {
                self.won = true;
                Verdict::Win
            }
        };
        Ok(verdict)
    }

    /// Final statistics, available only once the secret was found.
    pub fn into_stats(self) -> Option<GameStats> {
        if self.won {
            Some(GameStats::new(self.attempts, self.secret))
        } else {
            None
        }
    }
}

/// Parse one input line as a guess. Surrounding whitespace is ignored;
/// anything that is not a 32-bit integer yields `None`.
pub fn parse_guess(line: &str) -> Option<i32> {
    line.trim().parse().ok()
}
