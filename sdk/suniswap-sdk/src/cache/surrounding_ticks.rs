//! Depth chart data
//!
//! Each entry carries the liquidity active over [tick, next entry).
//! Walking up crosses a tick and adds its net. Walking down leaves the
//! range above by removing the net of the tick just crossed.

use tracing::error;

use crate::errors::{ClmmError, Result};
use crate::math::liquidity_math::add_liquidity_delta;
use crate::math::tick_math::compress_tick;
use crate::state::pool::PoolState;
use crate::state::tick::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickProcessed {
    pub tick_idx: i32,
    pub liquidity_active: u128,
    pub liquidity_net: i128,
}

/// Walk outward from the pivot (last initialized tick at or below the
/// active tick). Output is ascending by tick.
pub fn surrounding_ticks(
    sorted_ticks: &[Tick],
    tick_current: i32,
    tick_spacing: u16,
    pool_liquidity: u128,
) -> Result<Vec<TickProcessed>> {
    let active_tick = compress_tick(tick_current, tick_spacing) * tick_spacing as i32;

    let pivot = match sorted_ticks.iter().rposition(|tick| tick.index <= active_tick) {
        Some(pivot) => pivot,
        None => {
            error!(tick_current, "no initialized tick at or below the active tick");
            return Err(ClmmError::PivotNotFound(tick_current));
        }
    };

    let pivot_is_active = sorted_ticks[pivot].index == active_tick;
    let active = TickProcessed {
        tick_idx: active_tick,
        liquidity_active: pool_liquidity,
        liquidity_net: if pivot_is_active {
            sorted_ticks[pivot].liquidity_net
        } else {
            0
        },
    };

    // Descending, starting at the pivot unless it is the active entry itself
    let below_end = if pivot_is_active { pivot } else { pivot + 1 };
    let mut below = Vec::with_capacity(below_end);
    let mut previous = active;
    for tick in sorted_ticks[..below_end].iter().rev() {
        let liquidity_active = previous
            .liquidity_net
            .checked_neg()
            .ok_or(ClmmError::MathOverflow)
            .and_then(|delta| add_liquidity_delta(previous.liquidity_active, delta))
            .map_err(|_| ClmmError::LiquidityUnderflow(tick.index))?;
        let processed = TickProcessed {
            tick_idx: tick.index,
            liquidity_active,
            liquidity_net: tick.liquidity_net,
        };
        below.push(processed);
        previous = processed;
    }
    below.reverse();

    // Ascending
    let mut above = Vec::with_capacity(sorted_ticks.len() - pivot - 1);
    let mut previous = active;
    for tick in &sorted_ticks[pivot + 1..] {
        let liquidity_active = add_liquidity_delta(previous.liquidity_active, tick.liquidity_net)
            .map_err(|_| ClmmError::LiquidityUnderflow(tick.index))?;
        let processed = TickProcessed {
            tick_idx: tick.index,
            liquidity_active,
            liquidity_net: tick.liquidity_net,
        };
        above.push(processed);
        previous = processed;
    }

    let mut processed = below;
    processed.push(active);
    processed.extend(above);
    Ok(processed)
}

/// Depth chart for a pool from whatever its tick cache has loaded
pub fn surrounding_ticks_for_pool(pool: &PoolState) -> Result<Vec<TickProcessed>> {
    let ticks = pool.tick_cache().initialized_ticks();
    surrounding_ticks(&ticks, pool.tick_current, pool.tick_spacing(), pool.liquidity)
}
