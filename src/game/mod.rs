//! # Game Module
//!
//! - [`secret`]: picks the secret number for a round
//! - [`round`]: pure state machine classifying guesses
//! - [`arith`]: sum/product/gcd hints shown after a miss
//! - [`session`]: console driver wiring input, output, analytics and history

pub mod arith;
pub mod round;
pub mod secret;
pub mod session;

pub use round::{parse_guess, Round, RoundError, Verdict};
pub use secret::{FixedSecret, RandomSecret, SecretSource, SECRET_MAX, SECRET_MIN};
pub use session::{render_history, GameSession, SessionOutcome};
