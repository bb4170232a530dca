use std::fmt;
use std::hash::{Hash, Hasher};

use anchor_lang::prelude::Pubkey;
use serde::{Deserialize, Serialize};

use crate::errors::{ClmmError, Result};

/// Token metadata as the UI knows it
/// Equality and hashing only look at (chain_tag, address)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub chain_tag: u16,
    #[serde(with = "crate::utils::pubkey_string")]
    pub address: Pubkey,
    pub decimals: u8,
    #[serde(default)]
    pub symbol: String,
}

impl Token {
    pub fn new(chain_tag: u16, address: Pubkey, decimals: u8, symbol: impl Into<String>) -> Self {
        Self {
            chain_tag,
            address,
            decimals,
            symbol: symbol.into(),
        }
    }

    /// True if this token is token0 of a pair with `other`
    /// Addresses compare as unsigned big-endian integers over their raw bytes
    pub fn sorts_before(&self, other: &Token) -> Result<bool> {
        if self.address == other.address {
            return Err(ClmmError::IdenticalTokens);
        }
        Ok(self.address.to_bytes() < other.address.to_bytes())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_tag == other.chain_tag && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_tag.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.symbol.is_empty() {
            write!(f, "{}", self.address)
        } else {
            f.write_str(&self.symbol)
        }
    }
}
