//! Decimal Scaling
//!
//! One table for every conversion between a display price (whole units of
//! quote per whole unit of base) and the raw pool ratio (smallest units of
//! token1 per smallest unit of token0).
//!
//! raw = display * 10^(d1 - d0)            when base is token0
//! raw = (1 / display) * 10^(d1 - d0)      when base is token1 (inverted)

use crate::errors::{ClmmError, Result};
use crate::math::full_math::{pow10, U256};

/// Side of the display fraction multiplied by 10^|d0 - d1|
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaledSide {
    Numerator,
    Denominator,
}

/// Scaling applied between display and raw prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalScaling {
    pub side: ScaledSide,
    pub factor: U256,
    pub invert: bool,
}

impl DecimalScaling {
    pub fn new(token0_decimals: u8, token1_decimals: u8, invert_price: bool) -> Result<Self> {
        // Keyed by (token0_has_more_decimals, invert_price)
        let side = match (token0_decimals > token1_decimals, invert_price) {
            (false, false) => ScaledSide::Numerator,
            (true, false) => ScaledSide::Denominator,
            (false, true) => ScaledSide::Denominator,
            (true, true) => ScaledSide::Numerator,
        };

        Ok(Self {
            side,
            factor: pow10(token0_decimals.abs_diff(token1_decimals))?,
            invert: invert_price,
        })
    }

    /// Display fraction -> raw (token1 per token0) fraction
    pub fn display_to_raw(&self, numerator: U256, denominator: U256) -> Result<(U256, U256)> {
        if denominator.is_zero() || numerator.is_zero() {
            return Err(ClmmError::DivisionByZero);
        }
        let (numerator, denominator) = match self.side {
            ScaledSide::Numerator => (
                numerator.checked_mul(self.factor).ok_or(ClmmError::MathOverflow)?,
                denominator,
            ),
            ScaledSide::Denominator => (
                numerator,
                denominator.checked_mul(self.factor).ok_or(ClmmError::MathOverflow)?,
            ),
        };
        Ok(if self.invert {
            (denominator, numerator)
        } else {
            (numerator, denominator)
        })
    }

    /// Raw (token1 per token0) fraction -> display fraction
    pub fn raw_to_display(&self, numerator: U256, denominator: U256) -> Result<(U256, U256)> {
        let (numerator, denominator) = if self.invert {
            (denominator, numerator)
        } else {
            (numerator, denominator)
        };
        // Undo the table side by scaling the opposite one
        match self.side {
            ScaledSide::Numerator => Ok((
                numerator,
                denominator.checked_mul(self.factor).ok_or(ClmmError::MathOverflow)?,
            )),
            ScaledSide::Denominator => Ok((
                numerator.checked_mul(self.factor).ok_or(ClmmError::MathOverflow)?,
                denominator,
            )),
        }
    }
}
