//! Price Math
//!
//! Conversions between typed prices and ticks.

use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::errors::{ClmmError, Result};
use crate::math::full_math::{narrow, widen, U256};
use crate::math::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
use crate::state::price::Price;
use crate::state::token::Token;

/// Encode a raw token1-per-token0 ratio as a Q64.64 sqrt price,
/// clamped into the valid range
pub fn encode_sqrt_price_x64(numerator: U256, denominator: U256) -> Result<u128> {
    if denominator.is_zero() {
        return Err(ClmmError::DivisionByZero);
    }
    let ratio_x128 = (widen(numerator) << 128) / widen(denominator);
    let sqrt_price = match narrow(ratio_x128.integer_sqrt()) {
        Ok(value) if value.bits() <= 128 => value.low_u128(),
        _ => MAX_SQRT_PRICE_X64,
    };
    Ok(sqrt_price.clamp(MIN_SQRT_PRICE_X64, MAX_SQRT_PRICE_X64))
}

/// Closest tick at or below a raw price
pub fn raw_price_to_closest_tick(price: &Price) -> Result<i32> {
    let (numerator, denominator) = price.raw_token1_per_token0()?;
    let sqrt_price_x64 = encode_sqrt_price_x64(numerator, denominator)?;
    let tick = get_tick_at_sqrt_price(sqrt_price_x64)?;
    if tick >= MAX_TICK {
        return Ok(MAX_TICK);
    }

    // The integer sqrt floors, so the next tick may still be at or below target
    let next = widen(U256::from(get_sqrt_price_at_tick(tick + 1)?));
    if next * next * widen(denominator) <= widen(numerator) << 128 {
        Ok(tick + 1)
    } else {
        Ok(tick)
    }
}

/// Closest tick for a display price typed as whole units of quote per base
pub fn price_to_closest_tick(
    numerator: U256,
    denominator: U256,
    base: &Token,
    quote: &Token,
) -> Result<i32> {
    let price = Price::from_display(base.clone(), quote.clone(), numerator, denominator)?;
    raw_price_to_closest_tick(&price)
}

/// Price of `base` in `quote` at a tick
pub fn tick_to_price(base: &Token, quote: &Token, tick: i32) -> Result<Price> {
    let sqrt_price_x64 = U256::from(get_sqrt_price_at_tick(tick)?);
    let ratio_x128 = sqrt_price_x64 * sqrt_price_x64;
    let q128 = U256::one() << 128;

    if base.sorts_before(quote)? {
        Price::new(base.clone(), quote.clone(), ratio_x128, q128)
    } else {
        Price::new(base.clone(), quote.clone(), q128, ratio_x128)
    }
}

/// A canonical tick range, lower strictly below upper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRange {
    pub lower: i32,
    pub upper: i32,
}

impl TickRange {
    pub fn new(lower: i32, upper: i32) -> Result<Self> {
        if lower >= upper {
            return Err(ClmmError::InvalidRange(lower, upper));
        }
        if !(MIN_TICK..=MAX_TICK).contains(&lower) {
            return Err(ClmmError::OutOfBoundsTick(lower));
        }
        if !(MIN_TICK..=MAX_TICK).contains(&upper) {
            return Err(ClmmError::OutOfBoundsTick(upper));
        }
        Ok(Self { lower, upper })
    }

    /// Range from ticks measured in the display orientation. An inverted
    /// display (quote/base shown flipped) negates the ticks and swaps the
    /// bounds so lower < upper still holds.
    pub fn for_display(lower: i32, upper: i32, invert: bool) -> Result<Self> {
        if invert {
            Self::new(-upper, -lower)
        } else {
            Self::new(lower, upper)
        }
    }

    /// Bounds as shown in the display orientation
    pub fn display_ticks(&self, invert: bool) -> (i32, i32) {
        if invert {
            (-self.upper, -self.lower)
        } else {
            (self.lower, self.upper)
        }
    }

    /// Canonical range from two ticks of typed bound prices. Bounds typed in
    /// an inverted display arrive high-to-low.
    pub fn from_bound_ticks(tick_a: i32, tick_b: i32) -> Result<Self> {
        Self::new(tick_a.min(tick_b), tick_a.max(tick_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;
    use anchor_lang::prelude::Pubkey;

    fn token(byte: u8, decimals: u8, symbol: &str) -> Token {
        Token::new(0, Pubkey::new_from_array([byte; 32]), decimals, symbol)
    }

    #[test]
    fn test_extreme_decimal_gap_is_an_error() {
        let whole = token(1, 0, "WHOLE");
        let dust = token(2, 80, "DUST");
        assert_eq!(
            price_to_closest_tick(U256::one(), U256::one(), &whole, &dust).unwrap_err(),
            ClmmError::MathOverflow
        );
        assert!(tick_to_price(&whole, &dust, 0).unwrap().display_ratio().is_err());
    }

    #[test]
    fn test_encode_sqrt_price() {
        assert_eq!(encode_sqrt_price_x64(U256::one(), U256::one()).unwrap(), Q64);
        assert_eq!(encode_sqrt_price_x64(U256::from(4), U256::one()).unwrap(), 2 * Q64);
        // Clamped at both ends
        assert_eq!(
            encode_sqrt_price_x64(U256::one(), U256::MAX).unwrap(),
            MIN_SQRT_PRICE_X64
        );
        assert_eq!(
            encode_sqrt_price_x64(U256::MAX, U256::one()).unwrap(),
            MAX_SQRT_PRICE_X64
        );
    }

    #[test]
    fn test_price_to_closest_tick_same_decimals() {
        let a = token(1, 6, "A");
        let b = token(2, 6, "B");
        assert_eq!(price_to_closest_tick(U256::one(), U256::one(), &a, &b).unwrap(), 0);
        // ln(2) / ln(1.0001) = 6931.8
        assert_eq!(price_to_closest_tick(U256::from(2), U256::one(), &a, &b).unwrap(), 6931);
    }

    #[test]
    fn test_price_to_closest_tick_decimals_and_inversion() {
        // SOL (9 decimals) sorts before USDC (6 decimals): 150 USDC per SOL
        // is a raw ratio of 0.15, tick floor(ln(0.15) / ln(1.0001)) = -18973
        let sol = token(1, 9, "SOL");
        let usdc = token(2, 6, "USDC");
        assert_eq!(
            price_to_closest_tick(U256::from(150), U256::one(), &sol, &usdc).unwrap(),
            -18973
        );
        // Typed the other way round it is the same pool price
        assert_eq!(
            price_to_closest_tick(U256::one(), U256::from(150), &usdc, &sol).unwrap(),
            -18973
        );
    }

    #[test]
    fn test_tick_to_price_round_trip() {
        let a = token(1, 6, "A");
        let b = token(2, 8, "B");
        for tick in [-120_000, -887, -1, 0, 1, 60, 46_054] {
            let price = tick_to_price(&a, &b, tick).unwrap();
            assert_eq!(raw_price_to_closest_tick(&price).unwrap(), tick);
            // Inverted orientation maps back to the same canonical tick
            let inverted = tick_to_price(&b, &a, tick).unwrap();
            assert_eq!(raw_price_to_closest_tick(&inverted).unwrap(), tick);
        }
    }

    #[test]
    fn test_tick_to_price_display() {
        let a = token(1, 6, "A");
        let b = token(2, 6, "B");
        let price = tick_to_price(&a, &b, 0).unwrap();
        assert_eq!(price.to_significant(4).unwrap(), "1.000");
    }

    #[test]
    fn test_tick_range_for_display() {
        let range = TickRange::for_display(-600, 1200, true).unwrap();
        assert_eq!(range, TickRange { lower: -1200, upper: 600 });
        assert_eq!(range.display_ticks(true), (-600, 1200));

        assert_eq!(
            TickRange::for_display(60, 60, false),
            Err(ClmmError::InvalidRange(60, 60))
        );
        assert_eq!(
            TickRange::from_bound_ticks(600, -600).unwrap(),
            TickRange { lower: -600, upper: 600 }
        );
    }
}
