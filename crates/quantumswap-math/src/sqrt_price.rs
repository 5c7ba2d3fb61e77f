//! Q96 square-root price encoding for pool initialization.
//!
//! ## Math
//!
//! Pools store $\sqrt{P} \times 2^{96}$ as a `uint160` (`sqrtPriceX96`),
//! where $P$ is token B per token A in raw (smallest-unit) terms. Given a
//! whole-unit integer price and the two tokens' decimal counts:
//!
//! ```text
//! adjusted      = price * 10^(decimals_a - decimals_b)
//! sqrt_price    = isqrt(adjusted * 10^18)
//! sqrtPriceX96  = sqrt_price * 2^96 / 10^9
//! ```
//!
//! Scaling by `10^18` before the root and dividing by `10^9 = sqrt(10^18)`
//! afterwards keeps about nine sub-unit digits of the root. Every step is
//! exact integer arithmetic; the final division truncates.
//!
//! ## Negative scaling exponent
//!
//! When `decimals_a < decimals_b` the multiplier would be a negative power of
//! ten, which has no integer value. The encoder fails with
//! [`PricingError::NegativeDecimalsExponent`] instead of guessing a scaling.

use std::fmt;

use alloy::primitives::U160;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use tracing::debug;

use crate::decimal;
use crate::error::{PricingError, Result};
use crate::sqrt::isqrt;

/// Largest token decimal count accepted by the encoder.
pub const MAX_DECIMALS: u8 = 18;

/// Fixed upscaling applied before the integer square root.
const SQRT_SCALE_EXPONENT: u32 = 18;

/// Lowest `sqrtPriceX96` a pool can be initialized with (inclusive).
pub const MIN_SQRT_RATIO: U160 = U160::from_limbs([0x1_0002_76a3, 0, 0]);

/// Upper bound on `sqrtPriceX96` a pool can be initialized with (exclusive).
pub const MAX_SQRT_RATIO: U160 =
    U160::from_limbs([0x5d95_1d52_6398_8d26, 0xefd1_fc6a_5064_8849, 0xfffd_8963]);

/// $2^{96}$, the Q96 scaling factor.
pub fn q96() -> BigUint {
    BigUint::one() << 96u32
}

/// A square-root price in Q64.96 fixed point.
///
/// Not bounded by construction; use [`SqrtPriceX96::to_u160`] before embedding
/// it in a transaction payload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SqrtPriceX96(BigUint);

impl SqrtPriceX96 {
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Convert to the on-chain `uint160` word.
    ///
    /// # Errors
    /// Returns [`PricingError::SqrtPriceOverflow`] if the value needs more than 160 bits.
    pub fn to_u160(&self) -> Result<U160> {
        U160::try_from_be_slice(&self.0.to_bytes_be())
            .ok_or_else(|| PricingError::SqrtPriceOverflow(self.0.to_string()))
    }

    /// Whether a pool would accept this value in `initialize`
    /// (`MIN_SQRT_RATIO <= value < MAX_SQRT_RATIO`).
    pub fn is_within_protocol_bounds(&self) -> bool {
        match self.to_u160() {
            Ok(value) => value >= MIN_SQRT_RATIO && value < MAX_SQRT_RATIO,
            Err(_) => false,
        }
    }

    /// Decode back to a price in token B per token A at engine precision.
    ///
    /// Inverse of [`encode_sqrt_price_x96`] up to the truncation of the
    /// square root:
    ///
    /// ```text
    /// price = sqrtPriceX96^2 / 2^192 * 10^(decimals_b - decimals_a)
    /// ```
    ///
    /// Both scaling directions are exact here, so either decimal ordering is accepted.
    ///
    /// # Errors
    /// Returns [`PricingError::DecimalsOutOfRange`] if either count exceeds [`MAX_DECIMALS`].
    pub fn to_price(&self, decimals_a: u8, decimals_b: u8) -> Result<BigDecimal> {
        check_decimals(decimals_a)?;
        check_decimals(decimals_b)?;

        let squared = BigInt::from(&self.0 * &self.0);
        let scale = i64::from(decimals_a) - i64::from(decimals_b);
        let raw = BigDecimal::new(squared, scale);
        let q192 = BigDecimal::from(BigInt::from(q96() * q96()));

        Ok(decimal::div(&raw, &q192))
    }
}

impl fmt::Display for SqrtPriceX96 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for SqrtPriceX96 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

fn check_decimals(decimals: u8) -> Result<()> {
    if decimals > MAX_DECIMALS {
        return Err(PricingError::DecimalsOutOfRange(decimals));
    }
    Ok(())
}

/// Encode a whole-unit integer `price` (token B per token A) as `sqrtPriceX96`.
///
/// # Errors
/// - [`PricingError::DecimalsOutOfRange`] if either count exceeds [`MAX_DECIMALS`].
/// - [`PricingError::NegativeDecimalsExponent`] if `decimals_a < decimals_b`.
pub fn encode_sqrt_price_x96(
    price: &BigUint,
    decimals_a: u8,
    decimals_b: u8,
) -> Result<SqrtPriceX96> {
    check_decimals(decimals_a)?;
    check_decimals(decimals_b)?;

    let decimals_diff = decimals_a
        .checked_sub(decimals_b)
        .ok_or(PricingError::NegativeDecimalsExponent {
            decimals_a,
            decimals_b,
        })?;

    let ten = BigUint::from(10u8);
    let decimals_multiplier = ten.pow(u32::from(decimals_diff));
    let adjusted_price = price * decimals_multiplier;
    let price_for_sqrt = adjusted_price * ten.pow(SQRT_SCALE_EXPONENT);

    let sqrt_price = isqrt(&price_for_sqrt);
    let numerator = sqrt_price * q96();
    let result = numerator / ten.pow(SQRT_SCALE_EXPONENT / 2);

    debug!(
        price = %price,
        decimals_a,
        decimals_b,
        sqrt_price_x96 = %result,
        "encoded sqrtPriceX96"
    );

    Ok(SqrtPriceX96(result))
}
