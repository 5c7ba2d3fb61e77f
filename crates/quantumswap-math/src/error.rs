//! Error taxonomy for the pricing engine.

use thiserror::Error;

use crate::tick::{MAX_TICK, MIN_TICK};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PricingError>;

/// Every failure the pricing engine can report.
///
/// All variants are plain values: nothing in this crate aborts the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Input string is not a decimal numeral.
    #[error("invalid decimal numeral {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// `price_to_tick` received a price of zero or below.
    #[error("price must be positive, got {0}")]
    NonPositivePrice(String),

    /// Price cannot be represented as a finite, non-zero `f64` for the logarithm.
    #[error("price {0} is outside the range supported by the tick logarithm")]
    PriceOutOfRange(String),

    /// Token decimal count above the supported maximum.
    #[error("token decimals {0} exceed the maximum of {max}", max = crate::sqrt_price::MAX_DECIMALS)]
    DecimalsOutOfRange(u8),

    /// `decimals_a < decimals_b` would require `10^negative` in integer arithmetic.
    #[error(
        "token A decimals ({decimals_a}) are fewer than token B decimals ({decimals_b}); \
         integer scaling by a negative power of ten is undefined"
    )]
    NegativeDecimalsExponent { decimals_a: u8, decimals_b: u8 },

    #[error("tick {0} is outside [{min}, {max}]", min = MIN_TICK, max = MAX_TICK)]
    TickOutOfRange(i64),

    #[error("unknown fee tier {0}; use 100, 500, 3000 or 10000")]
    UnknownFeeTier(u32),

    /// Encoded value needs more than the protocol's 160 bits.
    #[error("sqrtPriceX96 {0} does not fit in uint160")]
    SqrtPriceOverflow(String),
}
