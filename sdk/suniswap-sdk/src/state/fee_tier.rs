use serde::{Deserialize, Serialize};

use crate::constants::fee_tiers::*;
use crate::errors::ClmmError;

/// Static fee tier table
/// Must match the on-chain program exactly, a mismatch derives pool
/// addresses that simply do not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
    /// 0.01%
    Lowest,
    /// 0.05%
    Low,
    /// 0.30%
    Medium,
    /// 1.00%
    High,
}

impl FeeTier {
    pub const ALL: [FeeTier; 4] = [FeeTier::Lowest, FeeTier::Low, FeeTier::Medium, FeeTier::High];

    /// Fee rate in hundredths of a basis point (3000 = 0.3%)
    pub const fn fee_rate(self) -> u32 {
        match self {
            FeeTier::Lowest => FEE_TIER_100,
            FeeTier::Low => FEE_TIER_500,
            FeeTier::Medium => FEE_TIER_3000,
            FeeTier::High => FEE_TIER_10000,
        }
    }

    /// Tick spacing for this fee tier
    /// Lower fee = tighter spacing for stable pairs
    pub const fn tick_spacing(self) -> u16 {
        match self {
            FeeTier::Lowest => TICK_SPACING_100,
            FeeTier::Low => TICK_SPACING_500,
            FeeTier::Medium => TICK_SPACING_3000,
            FeeTier::High => TICK_SPACING_10000,
        }
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = ClmmError;

    fn try_from(fee_rate: u32) -> Result<Self, Self::Error> {
        FeeTier::ALL
            .into_iter()
            .find(|tier| tier.fee_rate() == fee_rate)
            .ok_or(ClmmError::UnknownFeeTier(fee_rate))
    }
}

impl From<FeeTier> for u32 {
    fn from(tier: FeeTier) -> u32 {
        tier.fee_rate()
    }
}
