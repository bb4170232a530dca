//! Tick Data Cache
//!
//! Lazily loads bitmap words and initialized ticks in a bounded window
//! around a tick. Lookups outside what has been loaded fail with
//! `TickNotLoaded` instead of silently returning an empty tick.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anchor_lang::prelude::Pubkey;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::constants::{seeds, MAX_TICK, MIN_TICK, TICKS_PER_BITMAP_WORD};
use crate::errors::{ClmmError, Result};
use crate::ledger::LedgerReader;
use crate::math::bit_math::{next_bit_position, prev_bit_position};
use crate::math::full_math::U256;
use crate::math::tick_math::compress_tick;
use crate::state::fee_tier::FeeTier;
use crate::state::tick::{Tick, TickAccount};
use crate::state::tick_bitmap::{tick_bitmap_position, tick_bitmap_word_index, TickBitmapAccount};
use crate::state::token::Token;
use crate::utils::pda::{derive_address, SeedIndex};

#[derive(Default)]
struct CacheData {
    /// Loaded bitmap words, absent accounts are stored as empty words
    words: BTreeMap<i16, U256>,
    /// Initialized ticks inside loaded words
    ticks: BTreeMap<i32, Tick>,
}

/// Per-pool cache of tick data
pub struct TickDataCache {
    program_id: Pubkey,
    token0: Pubkey,
    token1: Pubkey,
    fee: FeeTier,
    window_words: u16,
    data: RwLock<CacheData>,
    /// Serialises loads so overlapping windows never fetch twice
    load_lock: Mutex<()>,
}

impl fmt::Debug for TickDataCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickDataCache")
            .field("fee", &self.fee)
            .field("window_words", &self.window_words)
            .field("loaded_words", &self.read().words.len())
            .finish()
    }
}

impl TickDataCache {
    /// Cache for the pool of (token0, token1, fee); tokens must be canonical
    pub fn new(
        program_id: Pubkey,
        token0: &Token,
        token1: &Token,
        fee: FeeTier,
        window_words: u16,
    ) -> Result<Self> {
        if !token0.sorts_before(token1)? {
            return Err(ClmmError::InvalidAccountData(
                "tick cache tokens out of order".to_string(),
            ));
        }
        Ok(Self {
            program_id,
            token0: token0.address,
            token1: token1.address,
            fee,
            window_words,
            data: RwLock::new(CacheData::default()),
            load_lock: Mutex::new(()),
        })
    }

    pub fn tick_spacing(&self) -> u16 {
        self.fee.tick_spacing()
    }

    pub fn window_words(&self) -> u16 {
        self.window_words
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn word_address(&self, word_index: i16) -> Pubkey {
        derive_address(
            &self.program_id,
            seeds::TICK_BITMAP_SEED,
            &self.token0,
            &self.token1,
            self.fee,
            Some(SeedIndex::Word(word_index)),
        )
        .0
    }

    fn tick_address(&self, tick_index: i32) -> Pubkey {
        derive_address(
            &self.program_id,
            seeds::TICK_SEED,
            &self.token0,
            &self.token1,
            self.fee,
            Some(SeedIndex::Tick(tick_index)),
        )
        .0
    }

    /// Bitmap words covering the whole tick domain
    fn word_bounds(&self) -> (i16, i16) {
        let spacing = self.tick_spacing();
        (
            tick_bitmap_word_index(MIN_TICK, spacing),
            tick_bitmap_word_index(MAX_TICK, spacing),
        )
    }

    /// Load every bitmap word within `window_words` of the word holding
    /// `around_tick`, plus the initialized ticks they point at
    ///
    /// Returns the number of words fetched; words already loaded are skipped
    pub async fn eager_load_cache(
        &self,
        reader: &dyn LedgerReader,
        around_tick: i32,
    ) -> Result<usize> {
        let _guard = self.load_lock.lock().await;

        let spacing = self.tick_spacing();
        let center = tick_bitmap_word_index(around_tick, spacing) as i32;
        let (min_word, max_word) = self.word_bounds();
        let first = (center - self.window_words as i32).max(min_word as i32);
        let last = (center + self.window_words as i32).min(max_word as i32);

        let missing: Vec<i16> = {
            let data = self.read();
            (first..=last)
                .map(|word| word as i16)
                .filter(|word| !data.words.contains_key(word))
                .collect()
        };
        if missing.is_empty() {
            debug!(around_tick, "tick window already loaded");
            return Ok(0);
        }

        // Bitmap words
        let word_addresses: Vec<Pubkey> = missing.iter().map(|w| self.word_address(*w)).collect();
        let word_accounts = reader.fetch_accounts_multiple(&word_addresses).await?;
        if word_accounts.len() != missing.len() {
            return Err(ClmmError::Ledger(format!(
                "expected {} bitmap accounts, got {}",
                missing.len(),
                word_accounts.len()
            )));
        }

        let mut words = Vec::with_capacity(missing.len());
        let mut tick_indexes = Vec::new();
        for (word_index, account) in missing.iter().zip(word_accounts) {
            let word = match account {
                Some(bytes) => {
                    let account = TickBitmapAccount::decode(&bytes)?;
                    if account.word_index != *word_index {
                        return Err(ClmmError::InvalidAccountData(format!(
                            "bitmap word {} stored at index {}",
                            account.word_index, word_index
                        )));
                    }
                    account.word()
                }
                None => U256::zero(),
            };

            let mut position = 0u8;
            while let Some(bit) = next_bit_position(word, position) {
                let compressed = *word_index as i32 * TICKS_PER_BITMAP_WORD + bit as i32;
                tick_indexes.push(compressed * spacing as i32);
                if bit == u8::MAX {
                    break;
                }
                position = bit + 1;
            }
            words.push((*word_index, word));
        }

        // Initialized ticks
        let mut ticks = Vec::with_capacity(tick_indexes.len());
        if !tick_indexes.is_empty() {
            let tick_addresses: Vec<Pubkey> =
                tick_indexes.iter().map(|t| self.tick_address(*t)).collect();
            let tick_accounts = reader.fetch_accounts_multiple(&tick_addresses).await?;
            if tick_accounts.len() != tick_indexes.len() {
                return Err(ClmmError::Ledger(format!(
                    "expected {} tick accounts, got {}",
                    tick_indexes.len(),
                    tick_accounts.len()
                )));
            }

            for (tick_index, account) in tick_indexes.iter().zip(tick_accounts) {
                match account {
                    Some(bytes) => {
                        let tick = Tick::from(&TickAccount::decode(&bytes)?);
                        if tick.index != *tick_index {
                            return Err(ClmmError::InvalidAccountData(format!(
                                "tick {} stored at index {}",
                                tick.index, tick_index
                            )));
                        }
                        ticks.push(tick);
                    }
                    None => {
                        warn!(tick_index, "bitmap marks tick initialized but account is missing");
                    }
                }
            }
        }

        debug!(
            around_tick,
            words = words.len(),
            ticks = ticks.len(),
            "loaded tick window"
        );

        let loaded = words.len();
        let mut data = self.write();
        data.words.extend(words);
        data.ticks.extend(ticks.into_iter().map(|tick| (tick.index, tick)));
        Ok(loaded)
    }

    /// Sorted indexes of loaded bitmap words
    pub fn loaded_words(&self) -> Vec<i16> {
        self.read().words.keys().copied().collect()
    }

    /// Cached tick, or an uninitialized tick inside a loaded word
    pub fn get_tick(&self, index: i32) -> Result<Tick> {
        let word_index = tick_bitmap_word_index(index, self.tick_spacing());
        let data = self.read();
        if !data.words.contains_key(&word_index) {
            return Err(ClmmError::TickNotLoaded(index));
        }
        Ok(data
            .ticks
            .get(&index)
            .copied()
            .unwrap_or_else(|| Tick::uninitialized(index)))
    }

    /// Initialized ticks in the cache, ascending by index
    pub fn initialized_ticks(&self) -> Vec<Tick> {
        self.read().ticks.values().copied().collect()
    }

    /// Next initialized tick in the same bitmap word, searching left
    /// (`lte`) or right of `tick`. Returns the word boundary and `false`
    /// when nothing is initialized in that direction.
    pub fn next_initialized_tick_within_one_word(&self, tick: i32, lte: bool) -> Result<(i32, bool)> {
        let spacing = self.tick_spacing() as i32;
        let compressed = compress_tick(tick, self.tick_spacing());
        let data = self.read();

        if lte {
            let (word_index, bit) = tick_bitmap_position(compressed);
            let word = data
                .words
                .get(&word_index)
                .ok_or(ClmmError::TickNotLoaded(tick))?;

            Ok(match prev_bit_position(*word, bit) {
                Some(found) => ((compressed - (bit - found) as i32) * spacing, true),
                None => ((compressed - bit as i32) * spacing, false),
            })
        } else {
            // Start from the next compressed tick
            let (word_index, bit) = tick_bitmap_position(compressed + 1);
            let word = data
                .words
                .get(&word_index)
                .ok_or(ClmmError::TickNotLoaded(tick))?;

            Ok(match next_bit_position(*word, bit) {
                Some(found) => ((compressed + 1 + (found - bit) as i32) * spacing, true),
                None => ((compressed + 1 + (u8::MAX - bit) as i32) * spacing, false),
            })
        }
    }
}
