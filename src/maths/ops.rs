//! Numeric operations
//!
//! Plain functions over already-validated operands.

use std::sync::atomic::{AtomicBool, Ordering};

use super::result::{OpValue, Special};

/// Smallest double from which every representable value is even (2^53)
const ALL_EVEN_THRESHOLD: f64 = 9_007_199_254_740_992.0;

/// 171! no longer fits in a double
const MAX_FINITE_FACTORIAL: u64 = 170;

pub fn add(x: f64, y: f64) -> OpValue {
    OpValue::from_f64(x + y)
}

pub fn subtract(x: f64, y: f64) -> OpValue {
    OpValue::from_f64(x - y)
}

pub fn multiply(x: f64, y: f64) -> OpValue {
    OpValue::from_f64(x * y)
}

/// Division with `0 / 0` reported as `NaN`
pub fn divide(x: f64, y: f64) -> OpValue {
    if x == 0.0 && y == 0.0 {
        return OpValue::Special(Special::NaN);
    }
    OpValue::from_f64(x / y)
}

/// Remainder of the truncated operands, sign follows the dividend
pub fn modulus(x: f64, y: f64) -> OpValue {
    OpValue::from_f64(x.trunc() % y.trunc())
}

/// Iterative factorial in double precision
///
/// Anything past 170! overflows, so it is reported as `Infinity` without
/// running the loop.
#[allow(clippy::cast_precision_loss)]
pub fn factorial(n: u64) -> OpValue {
    if n > MAX_FINITE_FACTORIAL {
        return OpValue::Special(Special::Infinity);
    }
    OpValue::Number((2..=n).fold(1.0, |acc, k| acc * k as f64))
}

/// Trial division by every integer from 2 up to the square root of `n`
pub const fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    let mut divisor = 2;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}

/// Primality of an integer-valued double
///
/// Doubles at or above 2^53 are all even, hence composite.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn is_prime_value(n: f64) -> bool {
    if n >= ALL_EVEN_THRESHOLD {
        return false;
    }
    n >= 2.0 && is_prime(n as u64)
}

/// The n-th prime, found by scanning upward from 2
///
/// No sieve and no upper bound: cost grows with `n`. The scan checks
/// `cancelled` before each candidate and gives up with `None` once it is set.
pub fn nth_prime(n: u64, cancelled: &AtomicBool) -> Option<u64> {
    let mut count = 0;
    let mut candidate = 1;
    while count < n {
        if cancelled.load(Ordering::Relaxed) {
            return None;
        }
        candidate += 1;
        if is_prime(candidate) {
            count += 1;
        }
    }
    Some(candidate)
}
