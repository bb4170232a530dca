//! Local swap simulation
//!
//! Runs the swap-step loop against a copy of the pool's price, tick and
//! liquidity, crossing ticks out of the pool's tick cache. The snapshot
//! itself is never touched.

use tracing::debug;

use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::errors::{ClmmError, Result};
use crate::math::liquidity_math::add_liquidity_delta;
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
use crate::state::pool::PoolState;

/// Outcome of a simulated swap through one pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapSimulation {
    /// Input consumed, fee included
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    pub sqrt_price_after_x64: u128,
    pub tick_after: i32,
    pub liquidity_after: u128,
    pub ticks_crossed: u32,
}

/// Working copy of the pool while the swap runs
struct SwapState {
    amount_remaining: i64,
    amount_calculated: u64,
    fee_amount: u64,
    sqrt_price_x64: u128,
    tick: i32,
    liquidity: u128,
    ticks_crossed: u32,
}

/// Simulate a swap of `amount_specified` against `pool`
///
/// Positive `amount_specified` is exact input, negative is exact output.
/// `sqrt_price_limit_x64` defaults to the edge of the price domain. Running
/// into the limit with amount left, or out of the loaded tick window, is
/// `InsufficientLiquidity`.
pub fn simulate_swap(
    pool: &PoolState,
    zero_for_one: bool,
    amount_specified: i64,
    sqrt_price_limit_x64: Option<u128>,
) -> Result<SwapSimulation> {
    if amount_specified == 0 {
        return Err(ClmmError::ZeroAmount);
    }
    let exact_input = amount_specified > 0;
    let fee_rate = pool.fee.fee_rate();
    let cache = pool.tick_cache();

    let sqrt_price_limit_x64 = sqrt_price_limit_x64.unwrap_or(if zero_for_one {
        MIN_SQRT_PRICE_X64 + 1
    } else {
        MAX_SQRT_PRICE_X64 - 1
    });
    let limit_valid = if zero_for_one {
        sqrt_price_limit_x64 < pool.sqrt_price_x64 && sqrt_price_limit_x64 >= MIN_SQRT_PRICE_X64
    } else {
        sqrt_price_limit_x64 > pool.sqrt_price_x64 && sqrt_price_limit_x64 <= MAX_SQRT_PRICE_X64
    };
    if !limit_valid {
        return Err(ClmmError::OutOfBoundsPrice(sqrt_price_limit_x64));
    }

    let mut state = SwapState {
        amount_remaining: amount_specified,
        amount_calculated: 0,
        fee_amount: 0,
        sqrt_price_x64: pool.sqrt_price_x64,
        tick: pool.tick_current,
        liquidity: pool.liquidity,
        ticks_crossed: 0,
    };

    while state.amount_remaining != 0 && state.sqrt_price_x64 != sqrt_price_limit_x64 {
        let (next_tick, initialized) = cache
            .next_initialized_tick_within_one_word(state.tick, zero_for_one)
            .map_err(|err| {
                debug!(pool = %pool.address, tick = state.tick, error = %err, "swap left the loaded tick window");
                ClmmError::InsufficientLiquidity
            })?;
        let next_tick = next_tick.clamp(MIN_TICK, MAX_TICK);

        let sqrt_price_next_tick = get_sqrt_price_at_tick(next_tick)?;
        let sqrt_price_target = if zero_for_one {
            sqrt_price_next_tick.max(sqrt_price_limit_x64)
        } else {
            sqrt_price_next_tick.min(sqrt_price_limit_x64)
        };

        let step = compute_swap_step(
            state.sqrt_price_x64,
            sqrt_price_target,
            state.liquidity,
            state.amount_remaining,
            fee_rate,
        )?;
        state.sqrt_price_x64 = step.sqrt_price_next_x64;

        let amount_in = i64::try_from(step.amount_in).map_err(|_| ClmmError::AmountOverflow)?;
        let fee_amount = i64::try_from(step.fee_amount).map_err(|_| ClmmError::AmountOverflow)?;
        let amount_out = i64::try_from(step.amount_out).map_err(|_| ClmmError::AmountOverflow)?;

        if exact_input {
            state.amount_remaining = state
                .amount_remaining
                .checked_sub(amount_in)
                .and_then(|remaining| remaining.checked_sub(fee_amount))
                .ok_or(ClmmError::MathOverflow)?;
            state.amount_calculated = state
                .amount_calculated
                .checked_add(step.amount_out)
                .ok_or(ClmmError::MathOverflow)?;
        } else {
            state.amount_remaining = state
                .amount_remaining
                .checked_add(amount_out)
                .ok_or(ClmmError::MathOverflow)?;
            state.amount_calculated = state
                .amount_calculated
                .checked_add(step.amount_in)
                .and_then(|total| total.checked_add(step.fee_amount))
                .ok_or(ClmmError::MathOverflow)?;
        }
        state.fee_amount = state
            .fee_amount
            .checked_add(step.fee_amount)
            .ok_or(ClmmError::MathOverflow)?;

        if state.sqrt_price_x64 == sqrt_price_next_tick {
            if initialized {
                let liquidity_net = cache.get_tick(next_tick)?.liquidity_net;
                // Moving left leaves positions, so the net is removed
                let delta = if zero_for_one {
                    liquidity_net.checked_neg().ok_or(ClmmError::MathOverflow)?
                } else {
                    liquidity_net
                };
                state.liquidity = add_liquidity_delta(state.liquidity, delta)
                    .map_err(|_| ClmmError::LiquidityUnderflow(next_tick))?;
                state.ticks_crossed += 1;
            }
            state.tick = if zero_for_one { next_tick - 1 } else { next_tick };
        } else {
            state.tick = get_tick_at_sqrt_price(state.sqrt_price_x64)?;
        }
    }

    if state.amount_remaining != 0 {
        debug!(
            pool = %pool.address,
            remaining = state.amount_remaining,
            "price limit reached before the amount was filled"
        );
        return Err(ClmmError::InsufficientLiquidity);
    }

    let (amount_in, amount_out) = if exact_input {
        (amount_specified.unsigned_abs(), state.amount_calculated)
    } else {
        (state.amount_calculated, amount_specified.unsigned_abs())
    };

    debug!(
        pool = %pool.address,
        zero_for_one,
        amount_in,
        amount_out,
        ticks_crossed = state.ticks_crossed,
        "simulated swap"
    );

    Ok(SwapSimulation {
        amount_in,
        amount_out,
        fee_amount: state.fee_amount,
        sqrt_price_after_x64: state.sqrt_price_x64,
        tick_after: state.tick,
        liquidity_after: state.liquidity,
        ticks_crossed: state.ticks_crossed,
    })
}
