//! Shared test helpers for the pricing engine.

#![allow(dead_code)]

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigUint;

/// Parses a decimal literal for expected values.
///
/// # Panics
/// Panics on a malformed literal (test input is always well-formed).
pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).expect("test literal should be a valid decimal")
}

/// Builds a `BigUint` from little-endian 32-bit digits.
///
/// # Example
/// ```ignore
/// let x = big_from_digits(&[0, 1]); // 2^32
/// ```
pub fn big_from_digits(digits: &[u32]) -> BigUint {
    BigUint::new(digits.to_vec())
}

/// Asserts `|actual - expected| <= tolerance`.
pub fn assert_within(actual: &BigDecimal, expected: &BigDecimal, tolerance: &BigDecimal) {
    let diff = (actual - expected).abs();
    assert!(
        &diff <= tolerance,
        "expected {expected} ± {tolerance}, got {actual} (diff {diff})"
    );
}

/// Asserts `|actual / expected - 1| <= tolerance`.
pub fn assert_relative(actual: &BigDecimal, expected: &BigDecimal, tolerance: &BigDecimal) {
    let ratio = actual / expected;
    assert_within(&ratio, &BigDecimal::from(1), tolerance);
}
