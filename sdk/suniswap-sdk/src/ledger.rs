//! Ledger read interface
//!
//! The ledger is a keyed blob store addressed by program-derived addresses.
//! A missing account is `None`, never an error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use anchor_lang::prelude::Pubkey;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::errors::{ClmmError, Result};
use crate::state::fee_tier::FeeTier;
use crate::state::pool::{PoolLoadState, PoolState};
use crate::state::token::Token;
use crate::utils::pda::pool_address;

#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// One result per address, in order
    async fn fetch_accounts_multiple(&self, addresses: &[Pubkey]) -> Result<Vec<Option<Vec<u8>>>> {
        let mut accounts = Vec::with_capacity(addresses.len());
        for address in addresses {
            accounts.push(self.fetch_account(address).await?);
        }
        Ok(accounts)
    }
}

/// In-memory ledger that counts every account it is asked for
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: RwLock<HashMap<Pubkey, Vec<u8>>>,
    fetches: AtomicUsize,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address, data);
    }

    /// Number of account reads served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    fn get(&self, address: &Pubkey) -> Option<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .cloned()
    }
}

#[async_trait]
impl LedgerReader for InMemoryLedger {
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self.get(address))
    }

    async fn fetch_accounts_multiple(&self, addresses: &[Pubkey]) -> Result<Vec<Option<Vec<u8>>>> {
        Ok(addresses.iter().map(|address| self.get(address)).collect())
    }
}

fn decode_pool(
    config: &EngineConfig,
    address: Pubkey,
    token_a: &Token,
    token_b: &Token,
    data: Option<Vec<u8>>,
) -> PoolLoadState {
    match data {
        None => PoolLoadState::NotExists,
        Some(bytes) => match PoolState::from_account(config, address, token_a, token_b, &bytes) {
            Ok(pool) => PoolLoadState::Exists(Arc::new(pool)),
            Err(err) => {
                warn!(%address, error = %err, "pool account failed to decode");
                PoolLoadState::Invalid
            }
        },
    }
}

/// Fetch and decode one pool
pub async fn fetch_pool(
    reader: &dyn LedgerReader,
    config: &EngineConfig,
    token_a: &Token,
    token_b: &Token,
    fee: FeeTier,
) -> Result<PoolLoadState> {
    let address = pool_address(&config.program_id, token_a, token_b, fee)?;
    let data = reader.fetch_account(&address).await?;
    Ok(decode_pool(config, address, token_a, token_b, data))
}

/// Fetch and decode many pools with a single multi-fetch
/// Pairs of identical tokens come back as `Invalid`
pub async fn fetch_pools(
    reader: &dyn LedgerReader,
    config: &EngineConfig,
    pairs: &[(Token, Token, FeeTier)],
) -> Result<Vec<PoolLoadState>> {
    let addresses: Vec<Option<Pubkey>> = pairs
        .iter()
        .map(|(a, b, fee)| pool_address(&config.program_id, a, b, *fee).ok())
        .collect();
    let to_fetch: Vec<Pubkey> = addresses.iter().flatten().copied().collect();
    let fetched = reader.fetch_accounts_multiple(&to_fetch).await?;
    if fetched.len() != to_fetch.len() {
        return Err(ClmmError::Ledger(format!(
            "expected {} pool accounts, got {}",
            to_fetch.len(),
            fetched.len()
        )));
    }
    let mut fetched = fetched.into_iter();

    let states: Vec<PoolLoadState> = pairs
        .iter()
        .zip(&addresses)
        .map(|((a, b, _), address)| match address {
            Some(address) => decode_pool(config, *address, a, b, fetched.next().flatten()),
            None => PoolLoadState::Invalid,
        })
        .collect();

    debug!(
        requested = pairs.len(),
        existing = states.iter().filter(|s| s.pool().is_some()).count(),
        "fetched pools"
    );
    Ok(states)
}
