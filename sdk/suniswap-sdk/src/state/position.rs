use std::sync::Arc;

use crate::errors::Result;
use crate::math::liquidity_math::{get_amount_0_delta, get_amount_1_delta, max_liquidity_for_amounts};
use crate::math::tick_math::{check_tick_range, get_sqrt_price_at_tick};
use crate::state::pool::PoolState;

/// Off-chain position preview
/// Token amounts are always recomputed from the pool snapshot, never stored
#[derive(Debug, Clone)]
pub struct Position {
    pub pool: Arc<PoolState>,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
}

impl Position {
    pub fn new(pool: Arc<PoolState>, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Result<Self> {
        check_tick_range(tick_lower, tick_upper, pool.tick_spacing())?;
        Ok(Self {
            pool,
            tick_lower,
            tick_upper,
            liquidity,
        })
    }

    /// Largest position both amounts can fund
    pub fn from_amounts(
        pool: Arc<PoolState>,
        tick_lower: i32,
        tick_upper: i32,
        amount0: u64,
        amount1: u64,
    ) -> Result<Self> {
        check_tick_range(tick_lower, tick_upper, pool.tick_spacing())?;
        let liquidity = max_liquidity_for_amounts(
            pool.sqrt_price_x64,
            get_sqrt_price_at_tick(tick_lower)?,
            get_sqrt_price_at_tick(tick_upper)?,
            amount0,
            amount1,
        )?;
        Self::new(pool, tick_lower, tick_upper, liquidity)
    }

    fn amounts(&self, round_up: bool) -> Result<(u64, u64)> {
        let sqrt_price_lower = get_sqrt_price_at_tick(self.tick_lower)?;
        let sqrt_price_upper = get_sqrt_price_at_tick(self.tick_upper)?;
        let pool = &self.pool;

        if pool.tick_current < self.tick_lower {
            let amount0 =
                get_amount_0_delta(sqrt_price_lower, sqrt_price_upper, self.liquidity, round_up)?;
            Ok((amount0, 0))
        } else if pool.tick_current < self.tick_upper {
            let amount0 =
                get_amount_0_delta(pool.sqrt_price_x64, sqrt_price_upper, self.liquidity, round_up)?;
            let amount1 =
                get_amount_1_delta(sqrt_price_lower, pool.sqrt_price_x64, self.liquidity, round_up)?;
            Ok((amount0, amount1))
        } else {
            let amount1 =
                get_amount_1_delta(sqrt_price_lower, sqrt_price_upper, self.liquidity, round_up)?;
            Ok((0, amount1))
        }
    }

    /// Token0 held at the current price, rounded down
    pub fn amount0(&self) -> Result<u64> {
        Ok(self.amounts(false)?.0)
    }

    /// Token1 held at the current price, rounded down
    pub fn amount1(&self) -> Result<u64> {
        Ok(self.amounts(false)?.1)
    }

    /// Amounts a deposit of this liquidity requires, rounded up
    pub fn mint_amounts(&self) -> Result<(u64, u64)> {
        self.amounts(true)
    }
}
