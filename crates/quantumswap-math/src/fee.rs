//! Pool fee tiers and their tick spacings.

use std::fmt;

use crate::error::{PricingError, Result};
use crate::tick::{Tick, MAX_TICK};

/// Fee tiers a pool can be created with, in hundredths of a basis point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeTier {
    /// 0.01%, tick spacing 1.
    OneBp,
    /// 0.05%, tick spacing 10.
    Low,
    /// 0.3%, tick spacing 60.
    Medium,
    /// 1%, tick spacing 200.
    High,
}

impl FeeTier {
    pub const ALL: [FeeTier; 4] = [FeeTier::OneBp, FeeTier::Low, FeeTier::Medium, FeeTier::High];

    /// Look up the tier for a raw fee value (`100`, `500`, `3000`, `10000`).
    ///
    /// # Errors
    /// Returns [`PricingError::UnknownFeeTier`] for any other value.
    pub fn from_fee(fee: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.fee() == fee)
            .ok_or(PricingError::UnknownFeeTier(fee))
    }

    pub fn fee(self) -> u32 {
        match self {
            FeeTier::OneBp => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 3_000,
            FeeTier::High => 10_000,
        }
    }

    pub fn tick_spacing(self) -> Tick {
        match self {
            FeeTier::OneBp => 1,
            FeeTier::Low => 10,
            FeeTier::Medium => 60,
            FeeTier::High => 200,
        }
    }

    /// Nearest tick that is a multiple of this tier's spacing.
    ///
    /// Ties round away from zero. The result is clamped to the widest usable
    /// range `[-k * spacing, k * spacing]` inside `[MIN_TICK, MAX_TICK]`.
    pub fn nearest_usable_tick(self, tick: Tick) -> Tick {
        let spacing = i64::from(self.tick_spacing());
        let magnitude = (i64::from(tick).abs() + spacing / 2) / spacing * spacing;
        let rounded = if tick < 0 { -magnitude } else { magnitude };

        let max_usable = i64::from(MAX_TICK) / spacing * spacing;
        rounded.clamp(-max_usable, max_usable) as Tick
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fee = self.fee();
        write!(f, "{}.{:02}%", fee / 10_000, fee % 10_000 / 100)
    }
}
