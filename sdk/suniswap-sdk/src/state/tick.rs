use anchor_lang::prelude::*;

use crate::errors::ClmmError;

/// Initialized tick as the client sees it
/// Crossing upward adds `liquidity_net` to active liquidity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tick {
    pub index: i32,
    /// Net liquidity change when crossing this tick (positive = liquidity added)
    pub liquidity_net: i128,
    /// Total liquidity referencing this tick
    pub liquidity_gross: u128,
}

impl Tick {
    /// Tick with no liquidity referencing it
    pub fn uninitialized(index: i32) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }
}

/// Tick account
/// PDA: ["tick", token0, token1, fee.to_be_bytes(), tick_index.to_be_bytes()]
#[account]
#[derive(Debug, Default)]
pub struct TickAccount {
    pub tick_index: i32,
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
}

impl TickAccount {
    pub const LEN: usize = 8 +  // discriminator
        4 +                     // tick_index
        16 +                    // liquidity_net
        16;                     // liquidity_gross

    /// Decode account bytes, checking the discriminator
    pub fn decode(data: &[u8]) -> std::result::Result<Self, ClmmError> {
        let mut slice = data;
        Self::try_deserialize(&mut slice)
            .map_err(|e| ClmmError::InvalidAccountData(format!("tick: {e}")))
    }

    /// Encode with discriminator, as the program stores it
    pub fn encode(&self) -> std::result::Result<Vec<u8>, ClmmError> {
        let mut data = Vec::with_capacity(Self::LEN);
        self.try_serialize(&mut data)
            .map_err(|e| ClmmError::InvalidAccountData(format!("tick: {e}")))?;
        Ok(data)
    }
}

impl From<&TickAccount> for Tick {
    fn from(account: &TickAccount) -> Self {
        Tick {
            index: account.tick_index,
            liquidity_net: account.liquidity_net,
            liquidity_gross: account.liquidity_gross,
        }
    }
}
