//! Liquidity Math
//!
//! Functions for computing liquidity deltas and token amounts.
//! All intermediates are widened so `L << 64` and `sp_upper * sp_lower`
//! never wrap.

use crate::errors::{ClmmError, Result};
use crate::math::full_math::{div_round_up, mul_div_u256, u256_to_u128, u256_to_u64, U256};

fn ordered(sqrt_price_a_x64: u128, sqrt_price_b_x64: u128) -> (u128, u128) {
    if sqrt_price_a_x64 < sqrt_price_b_x64 {
        (sqrt_price_a_x64, sqrt_price_b_x64)
    } else {
        (sqrt_price_b_x64, sqrt_price_a_x64)
    }
}

/// Add a signed liquidity delta to existing liquidity
pub fn add_liquidity_delta(x: u128, y: i128) -> Result<u128> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs())
            .ok_or(ClmmError::MathOverflow)
    } else {
        x.checked_add(y as u128).ok_or(ClmmError::MathOverflow)
    }
}

/// Amount of token 0 spanned by `liquidity` between two sqrt prices
///
/// amount_0 = L * Q64 * (sp_upper - sp_lower) / (sp_upper * sp_lower)
pub fn get_amount_0_delta(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);
    if sqrt_price_lower == 0 {
        return Err(ClmmError::DivisionByZero);
    }

    let numerator_1 = U256::from(liquidity) << 64;
    let numerator_2 = U256::from(sqrt_price_upper - sqrt_price_lower);
    let intermediate = mul_div_u256(
        numerator_1,
        numerator_2,
        U256::from(sqrt_price_upper),
        round_up,
    )?;

    let result = if round_up {
        div_round_up(intermediate, U256::from(sqrt_price_lower))?
    } else {
        intermediate / U256::from(sqrt_price_lower)
    };
    u256_to_u64(result)
}

/// Amount of token 1 spanned by `liquidity` between two sqrt prices
///
/// amount_1 = L * (sp_upper - sp_lower) / Q64
pub fn get_amount_1_delta(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);

    let result = mul_div_u256(
        U256::from(liquidity),
        U256::from(sqrt_price_upper - sqrt_price_lower),
        U256::one() << 64,
        round_up,
    )?;
    u256_to_u64(result)
}

/// Liquidity supplied by `amount_0` over a price range
/// Inverse of get_amount_0_delta, rounded down
pub fn get_liquidity_for_amount_0(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    amount_0: u64,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);
    let diff = sqrt_price_upper - sqrt_price_lower;
    if diff == 0 {
        return Err(ClmmError::DivisionByZero);
    }

    // L = amount_0 * sp_upper * sp_lower / (Q64 * (sp_upper - sp_lower))
    let numerator = U256::from(amount_0) * U256::from(sqrt_price_upper);
    let liquidity = mul_div_u256(
        numerator,
        U256::from(sqrt_price_lower),
        U256::from(diff) << 64,
        false,
    )?;
    u256_to_u128(liquidity)
}

/// Liquidity supplied by `amount_1` over a price range
/// Inverse of get_amount_1_delta, rounded down
pub fn get_liquidity_for_amount_1(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    amount_1: u64,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);
    let diff = sqrt_price_upper - sqrt_price_lower;
    if diff == 0 {
        return Err(ClmmError::DivisionByZero);
    }

    u256_to_u128((U256::from(amount_1) << 64) / U256::from(diff))
}

/// Maximum liquidity that both amounts can back for the range
/// [sqrt_price_lower, sqrt_price_upper] at the current sqrt price
pub fn max_liquidity_for_amounts(
    sqrt_price_current_x64: u128,
    sqrt_price_lower_x64: u128,
    sqrt_price_upper_x64: u128,
    amount_0: u64,
    amount_1: u64,
) -> Result<u128> {
    let (sqrt_price_lower_x64, sqrt_price_upper_x64) =
        ordered(sqrt_price_lower_x64, sqrt_price_upper_x64);

    if sqrt_price_current_x64 <= sqrt_price_lower_x64 {
        // Current price is below range, only token 0 is needed
        get_liquidity_for_amount_0(sqrt_price_lower_x64, sqrt_price_upper_x64, amount_0)
    } else if sqrt_price_current_x64 < sqrt_price_upper_x64 {
        let liquidity_0 =
            get_liquidity_for_amount_0(sqrt_price_current_x64, sqrt_price_upper_x64, amount_0)?;
        let liquidity_1 =
            get_liquidity_for_amount_1(sqrt_price_lower_x64, sqrt_price_current_x64, amount_1)?;
        // The scarcer side bounds what can be deposited
        Ok(liquidity_0.min(liquidity_1))
    } else {
        // Current price is above range, only token 1 is needed
        get_liquidity_for_amount_1(sqrt_price_lower_x64, sqrt_price_upper_x64, amount_1)
    }
}

/// Token amounts represented by `liquidity` at the current sqrt price
/// for a position in range [lower, upper]
pub fn get_amounts_for_liquidity(
    sqrt_price_current_x64: u128,
    sqrt_price_lower_x64: u128,
    sqrt_price_upper_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<(u64, u64)> {
    let (sqrt_price_lower_x64, sqrt_price_upper_x64) =
        ordered(sqrt_price_lower_x64, sqrt_price_upper_x64);

    if sqrt_price_current_x64 <= sqrt_price_lower_x64 {
        // Below range: all token 0
        let amount_0 =
            get_amount_0_delta(sqrt_price_lower_x64, sqrt_price_upper_x64, liquidity, round_up)?;
        Ok((amount_0, 0))
    } else if sqrt_price_current_x64 < sqrt_price_upper_x64 {
        let amount_0 =
            get_amount_0_delta(sqrt_price_current_x64, sqrt_price_upper_x64, liquidity, round_up)?;
        let amount_1 =
            get_amount_1_delta(sqrt_price_lower_x64, sqrt_price_current_x64, liquidity, round_up)?;
        Ok((amount_0, amount_1))
    } else {
        // Above range: all token 1
        let amount_1 =
            get_amount_1_delta(sqrt_price_lower_x64, sqrt_price_upper_x64, liquidity, round_up)?;
        Ok((0, amount_1))
    }
}
