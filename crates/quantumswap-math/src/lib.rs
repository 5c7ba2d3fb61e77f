//! quantumswap-math: tick/price conversion and Q96 square-root price encoding
//! for concentrated-liquidity pools.
//!
//! ## Scope
//!
//! Pure, synchronous arithmetic only. Nothing here signs, submits or reads
//! anything; the CLI and transaction layers call in with validated inputs and
//! format the returned values themselves.
//!
//! ## Architecture
//!
//! - [`sqrt`]: floor square root of a [`BigUint`](num_bigint::BigUint).
//! - [`decimal`]: fixed 72-digit, half-even [`BigDecimal`](bigdecimal::BigDecimal)
//!   arithmetic and the decimal string parser.
//! - [`tick`]: tick ↔ price conversion, base 1.0001.
//! - [`sqrt_price`]: integer price + token decimals → `sqrtPriceX96`.
//! - [`fee`]: fee tiers and tick spacing alignment.

pub mod decimal;
pub mod error;
pub mod fee;
pub mod sqrt;
pub mod sqrt_price;
pub mod tick;

pub use decimal::{parse_decimal, PRECISION_DIGITS};
pub use error::{PricingError, Result};
pub use fee::FeeTier;
pub use sqrt::isqrt;
pub use sqrt_price::{encode_sqrt_price_x96, SqrtPriceX96, MAX_DECIMALS};
pub use tick::{
    check_tick, price_to_tick, price_to_tick_f64, tick_to_price, tick_to_price_f64, Tick,
    MAX_TICK, MIN_TICK,
};
