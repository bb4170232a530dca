// SuniSwap SDK Constants
// Mirrors the on-chain program's tick domain, fee tiers and PDA seeds.

/// Minimum tick index (p(i) = 1.0001^i, this gives price ~= 0)
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index (this gives price ~= infinity for practical purposes)
pub const MAX_TICK: i32 = 443636;

/// Sqrt price at MIN_TICK (Q64.64 format)
pub const MIN_SQRT_PRICE_X64: u128 = 4295048017;

/// Sqrt price at MAX_TICK (Q64.64 format)
pub const MAX_SQRT_PRICE_X64: u128 = 79226673515401279992447579062;

/// Q64 multiplier (2^64)
pub const Q64: u128 = 1 << 64;

/// Fee denominator (1_000_000 = 100%)
pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;

/// Number of tick-spacing steps grouped into one bitmap word
pub const TICKS_PER_BITMAP_WORD: i32 = 256;

/// Bitmap words loaded on each side of the active word by the tick cache
pub const DEFAULT_TICK_WINDOW_WORDS: u16 = 2;

/// Default maximum number of pools in a route
pub const DEFAULT_MAX_HOPS: usize = 2;

/// Standard fee tiers (matching Uniswap V3)
pub mod fee_tiers {
    /// 0.01% fee (tick spacing 1) - for stable pairs
    pub const FEE_TIER_100: u32 = 100; // 0.01%
    pub const TICK_SPACING_100: u16 = 1;

    /// 0.05% fee (tick spacing 10) - for stable pairs
    pub const FEE_TIER_500: u32 = 500; // 0.05%
    pub const TICK_SPACING_500: u16 = 10;

    /// 0.30% fee (tick spacing 60) - for most pairs
    pub const FEE_TIER_3000: u32 = 3000; // 0.30%
    pub const TICK_SPACING_3000: u16 = 60;

    /// 1.00% fee (tick spacing 200) - for exotic pairs
    pub const FEE_TIER_10000: u32 = 10000; // 1.00%
    pub const TICK_SPACING_10000: u16 = 200;
}

/// Account seeds for PDA derivation
pub mod seeds {
    pub const POOL_SEED: &[u8] = b"pool";
    pub const TICK_SEED: &[u8] = b"tick";
    pub const TICK_BITMAP_SEED: &[u8] = b"tick_bitmap";
    pub const POSITION_SEED: &[u8] = b"position";
    pub const OBSERVATION_SEED: &[u8] = b"observation";
}
