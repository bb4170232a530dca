use std::fmt;

use crate::errors::{ClmmError, Result};
use crate::math::decimal_scale::DecimalScaling;
use crate::math::full_math::{mul_div_u256, u256_to_u64, U256};
use crate::state::token::Token;

/// Price of `base` in units of `quote`
/// Stored as the raw ratio of smallest units (quote per base)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    pub base: Token,
    pub quote: Token,
    pub numerator: U256,
    pub denominator: U256,
}

impl Price {
    pub fn new(base: Token, quote: Token, numerator: U256, denominator: U256) -> Result<Self> {
        if denominator.is_zero() {
            return Err(ClmmError::DivisionByZero);
        }
        // Fails on identical tokens
        base.sorts_before(&quote)?;
        Ok(Self {
            base,
            quote,
            numerator,
            denominator,
        })
    }

    /// Build from a display price typed in whole units of quote per base
    pub fn from_display(
        base: Token,
        quote: Token,
        numerator: U256,
        denominator: U256,
    ) -> Result<Self> {
        let (raw_numerator, raw_denominator) =
            Self::scaling(&base, &quote)?.display_to_raw(numerator, denominator)?;
        // raw is token1 per token0, orient back to quote per base
        let (numerator, denominator) = if base.sorts_before(&quote)? {
            (raw_numerator, raw_denominator)
        } else {
            (raw_denominator, raw_numerator)
        };
        Self::new(base, quote, numerator, denominator)
    }

    fn scaling(base: &Token, quote: &Token) -> Result<DecimalScaling> {
        if base.sorts_before(quote)? {
            DecimalScaling::new(base.decimals, quote.decimals, false)
        } else {
            DecimalScaling::new(quote.decimals, base.decimals, true)
        }
    }

    /// Raw ratio oriented as token1 per token0
    pub fn raw_token1_per_token0(&self) -> Result<(U256, U256)> {
        Ok(if self.base.sorts_before(&self.quote)? {
            (self.numerator, self.denominator)
        } else {
            (self.denominator, self.numerator)
        })
    }

    /// Same price quoted the other way round
    pub fn invert(&self) -> Result<Price> {
        Price::new(
            self.quote.clone(),
            self.base.clone(),
            self.denominator,
            self.numerator,
        )
    }

    /// Convert an amount of base into quote (raw units, rounded down)
    pub fn quote(&self, base_amount: u64) -> Result<u64> {
        let amount = mul_div_u256(
            U256::from(base_amount),
            self.numerator,
            self.denominator,
            false,
        )?;
        u256_to_u64(amount)
    }

    /// Display fraction in whole units of quote per base
    pub fn display_ratio(&self) -> Result<(U256, U256)> {
        let (numerator, denominator) = self.raw_token1_per_token0()?;
        Self::scaling(&self.base, &self.quote)?.raw_to_display(numerator, denominator)
    }

    /// Display price as a float, for rendering only
    pub fn to_f64(&self) -> Result<f64> {
        let (numerator, denominator) = self.display_ratio()?;
        Ok(ratio_to_f64(numerator, denominator))
    }

    /// Display price rounded to `digits` significant digits
    pub fn to_significant(&self, digits: usize) -> Result<String> {
        let value = self.to_f64()?;
        if value == 0.0 || !value.is_finite() {
            return Ok(format!("{value}"));
        }
        let magnitude = value.abs().log10().floor() as i64;
        let decimals = (digits as i64 - 1 - magnitude).max(0) as usize;
        Ok(format!("{value:.decimals$}"))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_significant(6) {
            Ok(value) => write!(f, "{} {}/{}", value, self.quote, self.base),
            Err(_) => write!(f, "? {}/{}", self.quote, self.base),
        }
    }
}

/// Lossy U256 ratio to f64, keeping the top bits of both sides
fn ratio_to_f64(numerator: U256, denominator: U256) -> f64 {
    let shift = numerator.bits().max(denominator.bits()).saturating_sub(120);
    let numerator = (numerator >> shift).low_u128() as f64;
    let denominator = (denominator >> shift).low_u128() as f64;
    if denominator == 0.0 {
        return f64::INFINITY;
    }
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::prelude::Pubkey;

    fn token(byte: u8, decimals: u8, symbol: &str) -> Token {
        Token::new(0, Pubkey::new_from_array([byte; 32]), decimals, symbol)
    }

    #[test]
    fn test_from_display_scales_decimals() {
        // 1 SOL (9 decimals) = 150 USDC (6 decimals)
        let sol = token(1, 9, "SOL");
        let usdc = token(2, 6, "USDC");
        let price = Price::from_display(sol.clone(), usdc.clone(), U256::from(150), U256::one()).unwrap();

        // 10^9 lamports quote to 150 * 10^6 USDC units
        assert_eq!(price.quote(1_000_000_000).unwrap(), 150_000_000);
        assert!((price.to_f64().unwrap() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_display_inverted_base() {
        // Same pair typed with base = USDC, which sorts after SOL
        let sol = token(1, 9, "SOL");
        let usdc = token(2, 6, "USDC");
        let price =
            Price::from_display(usdc.clone(), sol.clone(), U256::one(), U256::from(150)).unwrap();

        assert_eq!(price.quote(150_000_000).unwrap(), 1_000_000_000);
        let inverted = price.invert().unwrap();
        assert!((inverted.to_f64().unwrap() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_significant() {
        let a = token(1, 6, "A");
        let b = token(2, 6, "B");
        let price = Price::new(a, b, U256::from(1234567), U256::from(1000)).unwrap();
        assert_eq!(price.to_significant(4).unwrap(), "1235");
        assert_eq!(price.invert().unwrap().to_significant(3).unwrap(), "0.000810");
    }

    #[test]
    fn test_identical_tokens_rejected() {
        let a = token(1, 6, "A");
        assert_eq!(
            Price::new(a.clone(), a, U256::one(), U256::one()),
            Err(ClmmError::IdenticalTokens)
        );
    }
}
