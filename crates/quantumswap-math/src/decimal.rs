//! Fixed-precision decimal helpers.
//!
//! All high-precision price arithmetic runs on [`BigDecimal`] rounded to
//! [`PRECISION_DIGITS`] significant digits with round-half-to-even after every
//! multiplication or division. 72 decimal digits cover the 236 significant
//! bits of IEEE 754 octuple precision (`236 * log10(2) ≈ 71.04`).

use std::num::NonZeroU64;
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::error::{PricingError, Result};

/// Significant decimal digits kept by every rounded operation.
pub const PRECISION_DIGITS: u64 = 72;

/// Rounding applied at [`PRECISION_DIGITS`].
pub const ROUNDING: RoundingMode = RoundingMode::HalfEven;

fn precision() -> NonZeroU64 {
    NonZeroU64::new(PRECISION_DIGITS).unwrap_or(NonZeroU64::MIN)
}

/// Round `value` to the engine precision, dropping trailing zeros.
pub fn round_to_precision(value: &BigDecimal) -> BigDecimal {
    value.with_precision_round(precision(), ROUNDING).normalized()
}

/// Multiply and round to the engine precision.
pub fn mul(lhs: &BigDecimal, rhs: &BigDecimal) -> BigDecimal {
    round_to_precision(&(lhs * rhs))
}

/// Divide and round to the engine precision.
///
/// The quotient is computed on integers with at least two guard digits and a
/// sticky digit for any non-zero remainder, so the result is rounded once,
/// half-even, at [`PRECISION_DIGITS`].
///
/// The caller guarantees `rhs` is non-zero.
pub fn div(lhs: &BigDecimal, rhs: &BigDecimal) -> BigDecimal {
    let (numerator, lhs_scale) = lhs.as_bigint_and_exponent();
    let (denominator, rhs_scale) = rhs.as_bigint_and_exponent();
    if numerator.is_zero() {
        return BigDecimal::zero();
    }

    let shift = (PRECISION_DIGITS as i64 + 2 + decimal_digits(&denominator)
        - decimal_digits(&numerator))
    .max(0);
    let scaled = numerator * BigInt::from(10u8).pow(shift as u32);
    let mut quotient = &scaled / &denominator;
    let mut scale = lhs_scale - rhs_scale + shift;

    if !(&scaled % &denominator).is_zero() {
        let sticky = quotient.signum();
        quotient = quotient * BigInt::from(10u8) + sticky;
        scale += 1;
    }

    round_to_precision(&BigDecimal::new(quotient, scale))
}

fn decimal_digits(value: &BigInt) -> i64 {
    value.magnitude().to_str_radix(10).len() as i64
}

/// Parse a decimal numeral into a [`BigDecimal`] at the engine precision.
///
/// Accepted grammar, after trimming surrounding ASCII whitespace:
///
/// ```text
/// [+-] digits [ . digits ] [ (e|E) [+-] digits ]
/// ```
///
/// At least one mantissa digit is required; either side of the decimal point
/// may be empty (`"1."`, `".5"`). Thousands separators, underscores, `inf`
/// and `nan` are rejected.
///
/// # Errors
/// Returns [`PricingError::Parse`] if `input` does not match the grammar.
pub fn parse_decimal(input: &str) -> Result<BigDecimal> {
    let parse_error = |reason: String| PricingError::Parse {
        input: input.to_string(),
        reason,
    };

    let numeral = split_numeral(input.trim()).map_err(|reason| parse_error(reason.to_string()))?;
    // BigDecimal stores the scale as i64; keep `frac_len - exponent` inside it.
    (numeral.frac_digits.len() as i64)
        .checked_sub(numeral.exponent)
        .ok_or_else(|| parse_error("exponent out of range".to_string()))?;

    let mut canonical = String::with_capacity(input.len() + 2);
    if numeral.negative {
        canonical.push('-');
    }
    canonical.push_str(if numeral.int_digits.is_empty() { "0" } else { numeral.int_digits });
    if !numeral.frac_digits.is_empty() {
        canonical.push('.');
        canonical.push_str(numeral.frac_digits);
    }
    canonical.push_str(&format!("e{}", numeral.exponent));
    let value = BigDecimal::from_str(&canonical).map_err(|e| parse_error(e.to_string()))?;

    Ok(round_to_precision(&value))
}

/// Lexical pieces of a validated decimal numeral.
struct Numeral<'a> {
    negative: bool,
    int_digits: &'a str,
    frac_digits: &'a str,
    exponent: i64,
}

fn split_numeral(s: &str) -> std::result::Result<Numeral<'_>, &'static str> {
    if s.is_empty() {
        return Err("empty input");
    }

    let bytes = s.as_bytes();
    let mut pos = 0;
    let mut negative = false;

    if matches!(bytes[pos], b'+' | b'-') {
        negative = bytes[pos] == b'-';
        pos += 1;
    }

    let int_start = pos;
    pos += count_digits(&bytes[pos..]);
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        pos += count_digits(&bytes[pos..]);
        frac_digits = &s[frac_start..pos];
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return Err("missing digits");
    }

    let mut exponent = 0i64;
    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        pos += 1;
        let exp_start = pos;
        if pos < bytes.len() && matches!(bytes[pos], b'+' | b'-') {
            pos += 1;
        }
        let exp_digits = count_digits(&bytes[pos..]);
        if exp_digits == 0 {
            return Err("missing exponent digits");
        }
        pos += exp_digits;
        exponent = s[exp_start..pos]
            .parse()
            .map_err(|_| "exponent out of range")?;
    }

    if pos != bytes.len() {
        return Err("unexpected character");
    }

    Ok(Numeral {
        negative,
        int_digits,
        frac_digits,
        exponent,
    })
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
