//! Sqrt Price Math
//!
//! Functions for computing the next sqrt price given token deltas.

use crate::errors::{ClmmError, Result};
use crate::math::full_math::{mul_div_u256, u256_to_u128, U256};

/// Get the next sqrt price after swapping a specified amount of token 0
/// When adding token 0 (selling it):
///   new_sqrt_price = L * sqrt_price / (L + amount * sqrt_price)
///
/// When removing token 0 (buying it):
///   new_sqrt_price = L * sqrt_price / (L - amount * sqrt_price)
pub fn get_next_sqrt_price_from_amount_0_rounding_up(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u64,
    add: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price_x64);
    }

    let numerator = U256::from(liquidity) << 64;
    let product = U256::from(amount) * U256::from(sqrt_price_x64);

    let denominator = if add {
        // Selling token 0 (price goes down)
        numerator
            .checked_add(product)
            .ok_or(ClmmError::MathOverflow)?
    } else {
        // Buying token 0 (price goes up)
        if product >= numerator {
            return Err(ClmmError::InsufficientLiquidity);
        }
        numerator - product
    };

    let next = mul_div_u256(numerator, U256::from(sqrt_price_x64), denominator, true)?;
    u256_to_u128(next)
}

/// Get the next sqrt price after swapping a specified amount of token 1
/// When adding token 1 (selling it):
///   new_sqrt_price = sqrt_price + amount / L
///
/// When removing token 1 (buying it):
///   new_sqrt_price = sqrt_price - amount / L
pub fn get_next_sqrt_price_from_amount_1_rounding_down(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u64,
    add: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price_x64);
    }
    if liquidity == 0 {
        return Err(ClmmError::InsufficientLiquidity);
    }

    let shifted = U256::from(amount) << 64;
    let liquidity = U256::from(liquidity);

    if add {
        // Selling token 1 (price goes up)
        let quotient = u256_to_u128(shifted / liquidity)?;
        sqrt_price_x64
            .checked_add(quotient)
            .ok_or(ClmmError::MathOverflow)
    } else {
        // Buying token 1 (price goes down), quotient rounds up
        let (quotient, remainder) = shifted.div_mod(liquidity);
        let quotient = u256_to_u128(quotient)? + u128::from(!remainder.is_zero());
        if quotient >= sqrt_price_x64 {
            return Err(ClmmError::InsufficientLiquidity);
        }
        Ok(sqrt_price_x64 - quotient)
    }
}

/// Get the next sqrt price from input amount
/// Determines direction and calls appropriate function
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount_in: u64,
    zero_for_one: bool,
) -> Result<u128> {
    if zero_for_one {
        // Adding token 0, sqrt price decreases
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_price_x64, liquidity, amount_in, true)
    } else {
        // Adding token 1, sqrt price increases
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_price_x64, liquidity, amount_in, true)
    }
}

/// Get the next sqrt price from output amount
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount_out: u64,
    zero_for_one: bool,
) -> Result<u128> {
    if zero_for_one {
        // Removing token 1, sqrt price decreases
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_price_x64, liquidity, amount_out, false)
    } else {
        // Removing token 0, sqrt price increases
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_price_x64, liquidity, amount_out, false)
    }
}
