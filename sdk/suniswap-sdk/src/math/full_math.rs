//! Full precision math operations
//!
//! 256-bit and 512-bit intermediates for liquidity, amount and price
//! calculations. Every narrowing back to a native width is checked.

use crate::errors::{ClmmError, Result};

#[allow(clippy::all)]
mod wide {
    uint::construct_uint! {
        /// 256-bit unsigned integer
        pub struct U256(4);
    }
    uint::construct_uint! {
        /// 512-bit unsigned integer
        pub struct U512(8);
    }
}

pub use wide::{U256, U512};

pub use crate::constants::Q64;

/// Narrow a U256 into a u128, failing if high bits are set
pub fn u256_to_u128(x: U256) -> Result<u128> {
    if x.bits() > 128 {
        return Err(ClmmError::AmountOverflow);
    }
    Ok(x.low_u128())
}

/// Narrow a U256 into a u64, failing if high bits are set
pub fn u256_to_u64(x: U256) -> Result<u64> {
    if x.bits() > 64 {
        return Err(ClmmError::AmountOverflow);
    }
    Ok(x.low_u64())
}

/// Widen a U256 into a U512
pub fn widen(x: U256) -> U512 {
    let mut limbs = [0u64; 8];
    limbs[..4].copy_from_slice(&x.0);
    U512(limbs)
}

/// Narrow a U512 into a U256, failing if high bits are set
pub fn narrow(x: U512) -> Result<U256> {
    if x.0[4..].iter().any(|limb| *limb != 0) {
        return Err(ClmmError::MathOverflow);
    }
    let mut limbs = [0u64; 4];
    limbs.copy_from_slice(&x.0[..4]);
    Ok(U256(limbs))
}

/// Multiply two u128 numbers and divide by a third, with full precision
///
/// # Formula
/// result = floor((a * b) / denominator)
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(ClmmError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    u256_to_u128(product / U256::from(denominator))
}

/// Multiply two u128 numbers and divide by a third, rounding up
pub fn mul_div_round_up(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(ClmmError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    let denominator = U256::from(denominator);
    let (quotient, remainder) = product.div_mod(denominator);
    let quotient = if remainder.is_zero() {
        quotient
    } else {
        quotient
            .checked_add(U256::one())
            .ok_or(ClmmError::MathOverflow)?
    };
    u256_to_u128(quotient)
}

/// (a * b) / denominator over U256 operands with a 512-bit intermediate
pub fn mul_div_u256(a: U256, b: U256, denominator: U256, round_up: bool) -> Result<U256> {
    if denominator.is_zero() {
        return Err(ClmmError::DivisionByZero);
    }
    let product = widen(a) * widen(b);
    let (quotient, remainder) = product.div_mod(widen(denominator));
    let quotient = narrow(quotient)?;
    if round_up && !remainder.is_zero() {
        quotient
            .checked_add(U256::one())
            .ok_or(ClmmError::MathOverflow)
    } else {
        Ok(quotient)
    }
}

/// Divide rounding up
pub fn div_round_up(numerator: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(ClmmError::DivisionByZero);
    }
    let (quotient, remainder) = numerator.div_mod(denominator);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        quotient
            .checked_add(U256::one())
            .ok_or(ClmmError::MathOverflow)
    }
}

/// 10^exponent as a U256, failing past 10^77
pub fn pow10(exponent: u8) -> Result<U256> {
    (0..exponent).try_fold(U256::one(), |acc, _| {
        acc.checked_mul(U256::from(10u8))
            .ok_or(ClmmError::MathOverflow)
    })
}
