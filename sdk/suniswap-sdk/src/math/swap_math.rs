//! Swap Math
//!
//! Single swap-step computation used by the local swap simulator.

use crate::constants::FEE_RATE_DENOMINATOR;
use crate::errors::{ClmmError, Result};
use crate::math::full_math::{mul_div, mul_div_round_up};
use crate::math::liquidity_math::{get_amount_0_delta, get_amount_1_delta};
use crate::math::sqrt_price_math::{
    get_next_sqrt_price_from_input, get_next_sqrt_price_from_output,
};

/// Result of a single swap step computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStepResult {
    /// The new sqrt price after the swap step
    pub sqrt_price_next_x64: u128,
    /// Amount of input token consumed (excluding fee)
    pub amount_in: u64,
    /// Amount of output token produced
    pub amount_out: u64,
    /// Fee amount charged on the input
    pub fee_amount: u64,
}

/// Amount needed to move all the way to the target. `None` when that amount
/// does not fit a u64, which simply means the target is out of reach.
fn reachable(amount: Result<u64>) -> Result<Option<u64>> {
    match amount {
        Ok(value) => Ok(Some(value)),
        Err(ClmmError::AmountOverflow) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Compute the result of a single swap step
///
/// # Arguments
/// * `sqrt_price_current_x64` - Current sqrt price (Q64.64)
/// * `sqrt_price_target_x64` - Target sqrt price (next tick or price limit)
/// * `liquidity` - Active liquidity
/// * `amount_remaining` - Positive for exact input, negative for exact output
/// * `fee_rate` - Fee rate in hundredths of a bip (3000 = 0.3%)
pub fn compute_swap_step(
    sqrt_price_current_x64: u128,
    sqrt_price_target_x64: u128,
    liquidity: u128,
    amount_remaining: i64,
    fee_rate: u32,
) -> Result<SwapStepResult> {
    let zero_for_one = sqrt_price_current_x64 >= sqrt_price_target_x64;
    let exact_input = amount_remaining >= 0;
    let amount_remaining_abs = amount_remaining.unsigned_abs();

    // Exact input that reaches the target keeps the precomputed amount in
    let (sqrt_price_next_x64, amount_in_to_target) = if exact_input {
        let amount_remaining_less_fee = mul_div(
            amount_remaining_abs as u128,
            (FEE_RATE_DENOMINATOR - fee_rate) as u128,
            FEE_RATE_DENOMINATOR as u128,
        )? as u64;

        let amount_in_max = reachable(if zero_for_one {
            get_amount_0_delta(sqrt_price_target_x64, sqrt_price_current_x64, liquidity, true)
        } else {
            get_amount_1_delta(sqrt_price_current_x64, sqrt_price_target_x64, liquidity, true)
        })?;

        match amount_in_max {
            Some(max) if amount_remaining_less_fee >= max => (sqrt_price_target_x64, Some(max)),
            _ => {
                let next = get_next_sqrt_price_from_input(
                    sqrt_price_current_x64,
                    liquidity,
                    amount_remaining_less_fee,
                    zero_for_one,
                )?;
                (next, None)
            }
        }
    } else {
        let amount_out_max = reachable(if zero_for_one {
            get_amount_1_delta(sqrt_price_target_x64, sqrt_price_current_x64, liquidity, false)
        } else {
            get_amount_0_delta(sqrt_price_current_x64, sqrt_price_target_x64, liquidity, false)
        })?;

        match amount_out_max {
            Some(max) if amount_remaining_abs >= max => (sqrt_price_target_x64, None),
            _ => {
                let next = get_next_sqrt_price_from_output(
                    sqrt_price_current_x64,
                    liquidity,
                    amount_remaining_abs,
                    zero_for_one,
                )?;
                (next, None)
            }
        }
    };

    let reached_target = sqrt_price_next_x64 == sqrt_price_target_x64;

    // Recompute both sides over the actual price movement
    let (amount_in, mut amount_out) = if zero_for_one {
        let amount_in = match amount_in_to_target {
            Some(amount) => amount,
            None => get_amount_0_delta(sqrt_price_next_x64, sqrt_price_current_x64, liquidity, true)?,
        };
        let amount_out =
            get_amount_1_delta(sqrt_price_next_x64, sqrt_price_current_x64, liquidity, false)?;
        (amount_in, amount_out)
    } else {
        let amount_in = match amount_in_to_target {
            Some(amount) => amount,
            None => get_amount_1_delta(sqrt_price_current_x64, sqrt_price_next_x64, liquidity, true)?,
        };
        let amount_out =
            get_amount_0_delta(sqrt_price_current_x64, sqrt_price_next_x64, liquidity, false)?;
        (amount_in, amount_out)
    };

    // Never hand out more than was asked for
    if !exact_input && amount_out > amount_remaining_abs {
        amount_out = amount_remaining_abs;
    }

    let fee_amount = if exact_input && !reached_target {
        // Didn't reach target, the remainder is fee
        amount_remaining_abs.saturating_sub(amount_in)
    } else {
        mul_div_round_up(
            amount_in as u128,
            fee_rate as u128,
            (FEE_RATE_DENOMINATOR - fee_rate) as u128,
        )? as u64
    };

    Ok(SwapStepResult {
        sqrt_price_next_x64,
        amount_in,
        amount_out,
        fee_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;
    use crate::math::tick_math::get_sqrt_price_at_tick;

    #[test]
    fn test_compute_swap_step_exact_input_partial() {
        let target = get_sqrt_price_at_tick(-600).unwrap();
        let liquidity = 1_000_000_000_000u128;

        let result = compute_swap_step(Q64, target, liquidity, 1_000_000, 3000).unwrap();

        assert!(result.sqrt_price_next_x64 < Q64);
        assert!(result.sqrt_price_next_x64 > target);
        // Whole input is consumed between amount and fee
        assert_eq!(result.amount_in + result.fee_amount, 1_000_000);
        assert!(result.amount_out > 0 && result.amount_out < 1_000_000);
    }

    #[test]
    fn test_compute_swap_step_reaches_target() {
        let target = get_sqrt_price_at_tick(60).unwrap();
        let liquidity = 1_000_000u128;

        let result = compute_swap_step(Q64, target, liquidity, 1_000_000_000, 3000).unwrap();

        assert_eq!(result.sqrt_price_next_x64, target);
        assert!(result.amount_in + result.fee_amount < 1_000_000_000);
    }

    #[test]
    fn test_compute_swap_step_exact_output() {
        let target = get_sqrt_price_at_tick(-600).unwrap();
        let liquidity = 1_000_000_000_000u128;

        let result = compute_swap_step(Q64, target, liquidity, -1_000_000, 3000).unwrap();

        assert_eq!(result.amount_out, 1_000_000);
        // Input at price ~1 plus fee exceeds the output
        assert!(result.amount_in >= 1_000_000);
        assert!(result.fee_amount > 0);
    }

    #[test]
    fn test_compute_swap_step_zero_liquidity_jumps_to_target() {
        let target = get_sqrt_price_at_tick(-60).unwrap();
        let result = compute_swap_step(Q64, target, 0, 1_000, 3000).unwrap();
        assert_eq!(result.sqrt_price_next_x64, target);
        assert_eq!(result.amount_in, 0);
        assert_eq!(result.amount_out, 0);
    }
}
