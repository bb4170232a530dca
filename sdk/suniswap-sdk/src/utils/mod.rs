//! Utility functions for SuniSwap

pub mod pda;

pub use pda::*;

use crate::errors::Result;
use crate::state::token::Token;

/// Order a pair canonically: token0 has the numerically smaller address
pub fn sort_tokens<'a>(token_a: &'a Token, token_b: &'a Token) -> Result<(&'a Token, &'a Token)> {
    if token_a.sorts_before(token_b)? {
        Ok((token_a, token_b))
    } else {
        Ok((token_b, token_a))
    }
}

/// Serde helper storing a Pubkey as its base58 string
pub mod pubkey_string {
    use std::str::FromStr;

    use anchor_lang::prelude::Pubkey;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(key)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Pubkey::from_str(&raw).map_err(de::Error::custom)
    }
}
