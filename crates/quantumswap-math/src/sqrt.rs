//! Integer square root over arbitrary-precision unsigned integers.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Floor square root of `x` by the Babylonian method.
///
/// Starts from `(x + 1) / 2` and averages `z` with `x / z` until the
/// estimate stops decreasing. The last decreasing estimate is exactly
/// `floor(sqrt(x))`. Iteration count grows with the bit length of `x`.
pub fn isqrt(x: &BigUint) -> BigUint {
    if x.is_zero() {
        return BigUint::zero();
    }

    let two = BigUint::from(2u8);
    let mut z = (x + BigUint::one()) / &two;
    let mut y = x.clone();

    while z < y {
        y = z;
        z = (x / &y + &y) / &two;
    }

    y
}
