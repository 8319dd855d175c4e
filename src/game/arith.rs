//! Arithmetic hints shown after every missed guess.
//!
//! Results are widened to `i64`/`u32` so no pair of `i32` guesses can overflow.

/// Sum of the guess and the secret.
pub fn add(a: i32, b: i32) -> i64 {
    a as i64 + b as i64
}

/// Product of the guess and the secret.
pub fn multiply(a: i32, b: i32) -> i64 {
    a as i64 * b as i64
}

/// Greatest common divisor using Euclid's algorithm on absolute values.
///
/// Positive whenever at least one argument is nonzero; `gcd(0, 0) == 0`.
pub fn gcd(n: i32, m: i32) -> u32 {
    let mut a = n.unsigned_abs();
    let mut b = m.unsigned_abs();
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
