//! Position Liquidity Calculator
//!
//! Given one side of a deposit and a tick range, works out the liquidity and
//! the amount of the other token the position needs. Amounts are raw
//! smallest units against the raw sqrt price, so no decimal rescaling
//! happens here. Display ranges go through [`price_to_closest_tick`].

use std::sync::Arc;

use crate::errors::{ClmmError, Result};
use crate::math::full_math::U256;
use crate::math::liquidity_math::{
    get_amount_0_delta, get_amount_1_delta, get_liquidity_for_amount_0, get_liquidity_for_amount_1,
};
use crate::math::price_math::{price_to_closest_tick, TickRange};
use crate::math::tick_math::{check_tick_range, get_sqrt_price_at_tick, nearest_usable_tick};
use crate::state::pool::PoolState;
use crate::state::position::Position;
use crate::state::token::Token;

/// The side of the deposit the user typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownAmount {
    Amount0(u64),
    Amount1(u64),
}

impl KnownAmount {
    /// Tag an amount of `token` with the pool side it belongs to
    pub fn for_token(pool: &PoolState, token: &Token, amount: u64) -> Result<Self> {
        if pool.zero_for_one(token)? {
            Ok(KnownAmount::Amount0(amount))
        } else {
            Ok(KnownAmount::Amount1(amount))
        }
    }

    fn amount(self) -> u64 {
        match self {
            KnownAmount::Amount0(amount) | KnownAmount::Amount1(amount) => amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionQuote {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub amount0: u64,
    pub amount1: u64,
}

impl PositionQuote {
    /// Preview position holding the quoted liquidity
    pub fn into_position(self, pool: Arc<PoolState>) -> Result<Position> {
        Position::new(pool, self.tick_lower, self.tick_upper, self.liquidity)
    }
}

pub struct PositionCalculator;

impl PositionCalculator {
    /// Liquidity and counterpart amount for a deposit into [tick_lower, tick_upper)
    ///
    /// The typed side is echoed back as given. The other side is rounded up
    /// since it is what the depositor has to bring.
    pub fn compute(
        pool: &PoolState,
        tick_lower: i32,
        tick_upper: i32,
        known: KnownAmount,
    ) -> Result<PositionQuote> {
        check_tick_range(tick_lower, tick_upper, pool.tick_spacing())?;
        if known.amount() == 0 {
            return Err(ClmmError::ZeroAmount);
        }

        let sqrt_price_lower = get_sqrt_price_at_tick(tick_lower)?;
        let sqrt_price_upper = get_sqrt_price_at_tick(tick_upper)?;
        let sqrt_price_current = pool.sqrt_price_x64;

        let (liquidity, amount0, amount1) = if pool.tick_current < tick_lower {
            // Range sits above the price, only token0 fits
            let KnownAmount::Amount0(amount0) = known else {
                return Err(ClmmError::AmountNotAccepted);
            };
            let liquidity = get_liquidity_for_amount_0(sqrt_price_lower, sqrt_price_upper, amount0)?;
            (liquidity, amount0, 0)
        } else if pool.tick_current >= tick_upper {
            // Range sits below the price, only token1 fits
            let KnownAmount::Amount1(amount1) = known else {
                return Err(ClmmError::AmountNotAccepted);
            };
            let liquidity = get_liquidity_for_amount_1(sqrt_price_lower, sqrt_price_upper, amount1)?;
            (liquidity, 0, amount1)
        } else {
            match known {
                KnownAmount::Amount0(amount0) => {
                    let liquidity =
                        get_liquidity_for_amount_0(sqrt_price_current, sqrt_price_upper, amount0)?;
                    let amount1 =
                        get_amount_1_delta(sqrt_price_lower, sqrt_price_current, liquidity, true)?;
                    (liquidity, amount0, amount1)
                }
                KnownAmount::Amount1(amount1) => {
                    // Price exactly on the lower bound holds no token1
                    if sqrt_price_current <= sqrt_price_lower {
                        return Err(ClmmError::AmountNotAccepted);
                    }
                    let liquidity =
                        get_liquidity_for_amount_1(sqrt_price_lower, sqrt_price_current, amount1)?;
                    let amount0 =
                        get_amount_0_delta(sqrt_price_current, sqrt_price_upper, liquidity, true)?;
                    (liquidity, amount0, amount1)
                }
            }
        };

        Ok(PositionQuote {
            tick_lower,
            tick_upper,
            liquidity,
            amount0,
            amount1,
        })
    }

    /// Same as [`PositionCalculator::compute`] for bounds typed as display
    /// prices of `base` in `quote`, each a `(numerator, denominator)` pair.
    /// Bounds are snapped to the nearest usable tick.
    pub fn compute_for_display_range(
        pool: &PoolState,
        base: &Token,
        quote: &Token,
        lower_price: (U256, U256),
        upper_price: (U256, U256),
        known: KnownAmount,
    ) -> Result<PositionQuote> {
        if !pool.involves_token(base) || !pool.involves_token(quote) {
            return Err(ClmmError::TokenNotInPool);
        }
        let range = Self::display_range_ticks(pool, base, quote, lower_price, upper_price)?;
        Self::compute(pool, range.lower, range.upper, known)
    }

    /// Usable canonical tick range for two display bound prices
    pub fn display_range_ticks(
        pool: &PoolState,
        base: &Token,
        quote: &Token,
        lower_price: (U256, U256),
        upper_price: (U256, U256),
    ) -> Result<TickRange> {
        let spacing = pool.tick_spacing();
        let tick_a = price_to_closest_tick(lower_price.0, lower_price.1, base, quote)?;
        let tick_b = price_to_closest_tick(upper_price.0, upper_price.1, base, quote)?;
        TickRange::from_bound_ticks(
            nearest_usable_tick(tick_a, spacing),
            nearest_usable_tick(tick_b, spacing),
        )
    }
}
