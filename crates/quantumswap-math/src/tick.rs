//! Conversion between tick indices and prices.
//!
//! ## Math
//!
//! A tick `t` maps to the price $P = 1.0001^t$ (token B per token A). The
//! forward direction is computed exactly on [`BigDecimal`] by exponentiation
//! by squaring, rounded to [`PRECISION_DIGITS`](crate::decimal::PRECISION_DIGITS)
//! after every product, so results are reproducible bit for bit.
//!
//! The inverse, $t = \operatorname{round}(\ln P / \ln 1.0001)$, uses `f64`
//! logarithms. It is not an exact inverse of [`tick_to_price`], but the `f64`
//! error at `|t| <= MAX_TICK` is around `1e-10` ticks, far below the
//! half-tick rounding boundary, so every protocol tick round-trips.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive};
use tracing::{debug, trace};

use crate::decimal;
use crate::error::{PricingError, Result};

/// Tick index. The protocol stores ticks as `int24`; `i32` leaves headroom
/// for intermediate arithmetic.
pub type Tick = i32;

/// Lowest tick a pool accepts (`-887272`, from `log_1.0001(2^-128)`).
pub const MIN_TICK: Tick = -887_272;

/// Highest tick a pool accepts.
pub const MAX_TICK: Tick = -MIN_TICK;

/// Price ratio between adjacent ticks, exactly `1.0001`.
fn tick_base() -> BigDecimal {
    BigDecimal::new(BigInt::from(10_001), 4)
}

/// Validate that `tick` lies in `[MIN_TICK, MAX_TICK]`.
///
/// # Errors
/// Returns [`PricingError::TickOutOfRange`] otherwise.
pub fn check_tick(tick: i64) -> Result<Tick> {
    if tick < i64::from(MIN_TICK) || tick > i64::from(MAX_TICK) {
        return Err(PricingError::TickOutOfRange(tick));
    }
    Ok(tick as Tick)
}

/// Price at `tick`: $1.0001^{tick}$ at engine precision.
///
/// `tick == 0` returns exactly `1`. Negative ticks return the reciprocal of
/// the positive power. Cost is `O(log2 |tick|)` decimal multiplications.
pub fn tick_to_price(tick: Tick) -> BigDecimal {
    if tick == 0 {
        return BigDecimal::one();
    }

    let mut remaining = tick.unsigned_abs();
    let mut result = BigDecimal::one();
    let mut current_power = tick_base();

    while remaining > 0 {
        if remaining & 1 == 1 {
            result = decimal::mul(&result, &current_power);
        }
        current_power = decimal::mul(&current_power, &current_power);
        remaining >>= 1;
    }

    if tick < 0 {
        result = decimal::div(&BigDecimal::one(), &result);
    }

    trace!(tick, price = %result, "tick converted to price");
    result
}

/// Nearest tick to `price`: $\operatorname{round}(\ln P / \ln 1.0001)$.
///
/// Rounds half away from zero.
///
/// # Errors
/// - [`PricingError::NonPositivePrice`] if `price <= 0`.
/// - [`PricingError::PriceOutOfRange`] if `price` underflows or overflows `f64`.
/// - [`PricingError::TickOutOfRange`] if the nearest tick falls outside
///   `[MIN_TICK, MAX_TICK]`.
pub fn price_to_tick(price: &BigDecimal) -> Result<Tick> {
    if !price.is_positive() {
        return Err(PricingError::NonPositivePrice(price.to_string()));
    }

    let price_f64 = price
        .to_f64()
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| PricingError::PriceOutOfRange(price.to_string()))?;

    let tick = check_tick(i64::from(log_ratio_to_tick(price_f64)))?;
    debug!(price = %price, tick, "price converted to tick");
    Ok(tick)
}

/// `f64` counterpart of [`tick_to_price`]: fast, about 15 significant digits.
pub fn tick_to_price_f64(tick: Tick) -> f64 {
    1.0001f64.powi(tick)
}

/// `f64` counterpart of [`price_to_tick`].
///
/// Keeps the sentinel contract: a non-positive, NaN or infinite `price` maps
/// to tick `0`.
/// Callers that need to tell invalid input apart from tick zero should use
/// [`price_to_tick`].
pub fn price_to_tick_f64(price: f64) -> Tick {
    if price.is_nan() || price <= 0.0 || price.is_infinite() {
        return 0;
    }
    log_ratio_to_tick(price)
}

fn log_ratio_to_tick(price: f64) -> Tick {
    let tick = (price.ln() / 1.0001f64.ln()).round();
    // ln(f64::MAX) / ln(1.0001) ≈ 7.1e6, always inside i32.
    tick as Tick
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn assert_close(actual: &BigDecimal, expected: &BigDecimal, tolerance: &BigDecimal) {
        let diff = (actual - expected).abs();
        assert!(
            &diff <= tolerance,
            "expected {expected}, got {actual} (diff {diff})"
        );
    }

    #[test]
    fn test_tick_zero_is_exactly_one() {
        assert_eq!(tick_to_price(0), BigDecimal::one());
    }

    #[test]
    fn test_tick_one_is_base() {
        assert_eq!(tick_to_price(1), dec("1.0001"));
    }

    #[test]
    fn test_tick_minus_one_is_reciprocal() {
        let expected = dec("0.99990000999900009999000099990000999900009999000099990000999900009999000099990001");
        assert_close(&tick_to_price(-1), &expected, &dec("1e-70"));
    }

    #[test]
    fn test_tick_hundred_matches_reference_power() {
        // 1.0001^100 to 80 significant digits.
        let expected = dec("1.0100496620928765688550188629072566948229834795798171809198011591764084313199830");
        assert_close(&tick_to_price(100), &expected, &dec("1e-69"));
    }

    #[test]
    fn test_reciprocal_symmetry() {
        for tick in [1, 2, 3, 60, 4_095, 69_314, MAX_TICK] {
            let product = tick_to_price(tick) * tick_to_price(-tick);
            assert_close(&product, &BigDecimal::one(), &dec("1e-68"));
        }
    }

    #[test]
    fn test_extreme_ticks_stay_near_protocol_bounds() {
        // 1.0001^887272 ≈ 2^128, 1.0001^-887272 ≈ 2^-128.
        let top = tick_to_price(MAX_TICK).to_f64().unwrap();
        let bottom = tick_to_price(MIN_TICK).to_f64().unwrap();
        assert!((top / 2f64.powi(128) - 1.0).abs() < 1e-4, "top = {top}");
        assert!((bottom * 2f64.powi(128) - 1.0).abs() < 1e-4, "bottom = {bottom}");
    }

    #[test]
    fn test_price_two_is_tick_6932() {
        assert_eq!(price_to_tick(&dec("2")).unwrap(), 6932);
        assert_eq!(price_to_tick(&dec("0.5")).unwrap(), -6932);
    }

    #[test]
    fn test_price_one_is_tick_zero() {
        assert_eq!(price_to_tick(&BigDecimal::one()).unwrap(), 0);
    }

    #[test]
    fn test_non_positive_price_is_rejected() {
        for price in ["0", "-1", "-0.0001"] {
            assert!(matches!(
                price_to_tick(&dec(price)),
                Err(PricingError::NonPositivePrice(_))
            ));
        }
    }

    #[test]
    fn test_price_outside_f64_is_rejected() {
        assert!(matches!(
            price_to_tick(&dec("1e-400")),
            Err(PricingError::PriceOutOfRange(_))
        ));
        assert!(matches!(
            price_to_tick(&dec("1e400")),
            Err(PricingError::PriceOutOfRange(_))
        ));
    }

    #[test]
    fn test_price_beyond_protocol_ticks_is_rejected() {
        // Finite in f64, but roughly ±6.9 million ticks away from 1.
        assert_eq!(
            price_to_tick(&dec("1e300")),
            Err(PricingError::TickOutOfRange(6_908_101))
        );
        assert_eq!(
            price_to_tick(&dec("1e-300")),
            Err(PricingError::TickOutOfRange(-6_908_101))
        );
        // The outermost protocol ticks still map back.
        assert_eq!(price_to_tick(&tick_to_price(MAX_TICK)).unwrap(), MAX_TICK);
        assert_eq!(price_to_tick(&tick_to_price(MIN_TICK)).unwrap(), MIN_TICK);
    }

    #[test]
    fn test_round_trip_small_range() {
        for tick in -2_000..=2_000 {
            assert_eq!(price_to_tick(&tick_to_price(tick)).unwrap(), tick);
        }
    }

    #[test]
    fn test_f64_variants() {
        assert_eq!(tick_to_price_f64(0), 1.0);
        assert!((tick_to_price_f64(1) - 1.0001).abs() < 1e-15);
        assert_eq!(price_to_tick_f64(2.0), 6932);
        assert_eq!(price_to_tick_f64(0.0), 0);
        assert_eq!(price_to_tick_f64(-3.5), 0);
        assert_eq!(price_to_tick_f64(f64::NAN), 0);
        assert_eq!(price_to_tick_f64(tick_to_price_f64(-12_345)), -12_345);
    }

    #[test]
    fn test_check_tick_bounds() {
        assert_eq!(check_tick(0).unwrap(), 0);
        assert_eq!(check_tick(887_272).unwrap(), MAX_TICK);
        assert_eq!(check_tick(-887_272).unwrap(), MIN_TICK);
        assert_eq!(check_tick(887_273), Err(PricingError::TickOutOfRange(887_273)));
        assert_eq!(
            check_tick(i64::from(i32::MIN)),
            Err(PricingError::TickOutOfRange(i64::from(i32::MIN)))
        );
    }
}
