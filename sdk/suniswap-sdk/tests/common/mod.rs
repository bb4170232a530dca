#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use anchor_lang::prelude::Pubkey;
use suniswap_sdk::math::tick_math::{compress_tick, get_sqrt_price_at_tick};
use suniswap_sdk::state::pool::PoolAccount;
use suniswap_sdk::state::tick::TickAccount;
use suniswap_sdk::state::tick_bitmap::{tick_bitmap_position, TickBitmapAccount};
use suniswap_sdk::utils::{pool_address, sort_tokens, tick_address, tick_bitmap_address};
use suniswap_sdk::{EngineConfig, FeeTier, InMemoryLedger, Token};

pub const LIQUIDITY: u128 = 1_000_000_000_000;

pub fn token(byte: u8, decimals: u8, symbol: &str) -> Token {
    Token::new(0, Pubkey::new_from_array([byte; 32]), decimals, symbol)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Ledger pre-filled with pools and their ticks
pub struct TestLedger {
    pub ledger: Arc<InMemoryLedger>,
    pub config: EngineConfig,
}

impl TestLedger {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            ledger: Arc::new(InMemoryLedger::new()),
            config,
        }
    }

    /// Pool at `tick_current` with one position of `liquidity` over
    /// [-edge, edge], edge given in tick spacings
    pub fn add_pool(
        &self,
        token_a: &Token,
        token_b: &Token,
        fee: FeeTier,
        tick_current: i32,
        liquidity: u128,
        edge: i32,
    ) {
        let spacing = fee.tick_spacing() as i32;
        let net = liquidity as i128;
        self.add_pool_with_ticks(
            token_a,
            token_b,
            fee,
            tick_current,
            liquidity,
            &[(-edge * spacing, net), (edge * spacing, -net)],
        );
    }

    pub fn add_pool_with_ticks(
        &self,
        token_a: &Token,
        token_b: &Token,
        fee: FeeTier,
        tick_current: i32,
        liquidity: u128,
        ticks: &[(i32, i128)],
    ) {
        let program_id = &self.config.program_id;
        let (token0, token1) = sort_tokens(token_a, token_b).unwrap();
        let account = PoolAccount::new(
            &token0.address,
            &token1.address,
            fee,
            get_sqrt_price_at_tick(tick_current).unwrap(),
            liquidity,
            tick_current,
        );
        self.ledger.insert(
            pool_address(program_id, token_a, token_b, fee).unwrap(),
            account.to_account_data(),
        );

        let mut words: BTreeMap<i16, Vec<u8>> = BTreeMap::new();
        for (index, net) in ticks {
            let (word, bit) = tick_bitmap_position(compress_tick(*index, fee.tick_spacing()));
            words.entry(word).or_default().push(bit);
            let tick = TickAccount {
                tick_index: *index,
                liquidity_net: *net,
                liquidity_gross: net.unsigned_abs(),
            };
            self.ledger.insert(
                tick_address(program_id, token_a, token_b, fee, *index).unwrap(),
                tick.encode().unwrap(),
            );
        }
        for (word, bits) in words {
            self.ledger.insert(
                tick_bitmap_address(program_id, token_a, token_b, fee, word).unwrap(),
                TickBitmapAccount::from_bits(word, &bits).encode().unwrap(),
            );
        }
    }
}
