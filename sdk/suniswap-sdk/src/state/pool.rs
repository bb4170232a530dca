use std::sync::Arc;

use anchor_lang::prelude::*;
use anchor_lang::Discriminator;

use crate::cache::tick_cache::TickDataCache;
use crate::config::EngineConfig;
use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::errors::ClmmError;
use crate::math::full_math::U256;
use crate::state::fee_tier::FeeTier;
use crate::state::price::Price;
use crate::state::tick::Tick;
use crate::state::token::Token;
use crate::utils::sort_tokens;

type ClmmResult<T> = std::result::Result<T, ClmmError>;

/// Pool account as the program stores it
/// PDA: ["pool", token0, token1, fee.to_be_bytes()]
///
/// Every field is a byte array so the layout has no implicit padding and
/// matches the program byte for byte
#[account(zero_copy)]
#[repr(C)]
#[derive(Debug)]
pub struct PoolAccount {
    /// Token 0 mint (numerically smaller address)
    pub token0: [u8; 32],                         // 32 bytes, offset 0

    /// Token 1 mint
    pub token1: [u8; 32],                         // 32 bytes, offset 32

    /// Fee rate, big-endian
    pub fee: [u8; 4],                             // 4 bytes, offset 64

    /// Current sqrt price as Q64.64, little-endian
    pub sqrt_price_x64: [u8; 16],                 // 16 bytes, offset 68

    /// Liquidity currently in range, little-endian
    pub liquidity: [u8; 16],                      // 16 bytes, offset 84

    /// Current tick index, little-endian
    pub tick_current: [u8; 4],                    // 4 bytes, offset 100

    /// Current observation index
    pub observation_index: [u8; 2],               // 2 bytes, offset 104

    /// Number of populated observations
    pub observation_cardinality: [u8; 2],         // 2 bytes, offset 106

    /// Next observation cardinality (for expansion)
    pub observation_cardinality_next: [u8; 2],    // 2 bytes, offset 108
}
// Total: 110 bytes (+ 8 byte discriminator)

const _: () = assert!(std::mem::size_of::<PoolAccount>() == 110);

impl PoolAccount {
    pub const LEN: usize = 8 + 110;

    pub fn new(
        token0: &Pubkey,
        token1: &Pubkey,
        fee: FeeTier,
        sqrt_price_x64: u128,
        liquidity: u128,
        tick_current: i32,
    ) -> Self {
        Self {
            token0: token0.to_bytes(),
            token1: token1.to_bytes(),
            fee: fee.fee_rate().to_be_bytes(),
            sqrt_price_x64: sqrt_price_x64.to_le_bytes(),
            liquidity: liquidity.to_le_bytes(),
            tick_current: tick_current.to_le_bytes(),
            observation_index: [0; 2],
            observation_cardinality: 1u16.to_le_bytes(),
            observation_cardinality_next: 1u16.to_le_bytes(),
        }
    }

    /// Zero-copy view of account bytes, checking the discriminator
    pub fn load(data: &[u8]) -> ClmmResult<&PoolAccount> {
        if data.len() < Self::LEN {
            return Err(ClmmError::InvalidAccountData(format!(
                "pool: expected {} bytes, got {}",
                Self::LEN,
                data.len()
            )));
        }
        if &data[..8] != PoolAccount::DISCRIMINATOR {
            return Err(ClmmError::InvalidAccountData(
                "pool: discriminator mismatch".to_string(),
            ));
        }
        bytemuck::try_from_bytes(&data[8..Self::LEN])
            .map_err(|e| ClmmError::InvalidAccountData(format!("pool: {e:?}")))
    }

    /// Account bytes with discriminator
    pub fn to_account_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(PoolAccount::DISCRIMINATOR);
        data.extend_from_slice(bytemuck::bytes_of(self));
        data
    }

    pub fn token0_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.token0)
    }

    pub fn token1_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.token1)
    }

    pub fn fee_rate(&self) -> u32 {
        u32::from_be_bytes(self.fee)
    }

    pub fn sqrt_price_x64(&self) -> u128 {
        u128::from_le_bytes(self.sqrt_price_x64)
    }

    pub fn liquidity(&self) -> u128 {
        u128::from_le_bytes(self.liquidity)
    }

    pub fn tick_current(&self) -> i32 {
        i32::from_le_bytes(self.tick_current)
    }
}

/// Immutable pool snapshot
/// A re-fetch builds a new snapshot, nothing here is patched in place
#[derive(Debug)]
pub struct PoolState {
    pub address: Pubkey,
    pub token0: Token,
    pub token1: Token,
    pub fee: FeeTier,
    pub sqrt_price_x64: u128,
    pub liquidity: u128,
    pub tick_current: i32,
    pub observation_index: u16,
    pub observation_cardinality: u16,
    pub observation_cardinality_next: u16,
    tick_cache: Arc<TickDataCache>,
}

impl PoolState {
    /// Decode fetched pool bytes
    /// `token_a` and `token_b` may be given in either order
    pub fn from_account(
        config: &EngineConfig,
        address: Pubkey,
        token_a: &Token,
        token_b: &Token,
        data: &[u8],
    ) -> ClmmResult<Self> {
        let account = PoolAccount::load(data)?;
        let (token0, token1) = sort_tokens(token_a, token_b)?;

        if account.token0_pubkey() != token0.address || account.token1_pubkey() != token1.address {
            return Err(ClmmError::TokenNotInPool);
        }
        let fee = FeeTier::try_from(account.fee_rate())?;

        let sqrt_price_x64 = account.sqrt_price_x64();
        if !(MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price_x64) {
            return Err(ClmmError::OutOfBoundsPrice(sqrt_price_x64));
        }
        let tick_current = account.tick_current();
        if !(MIN_TICK..=MAX_TICK).contains(&tick_current) {
            return Err(ClmmError::OutOfBoundsTick(tick_current));
        }

        let tick_cache = Arc::new(TickDataCache::new(
            config.program_id,
            token0,
            token1,
            fee,
            config.tick_window_words,
        )?);

        Ok(Self {
            address,
            token0: token0.clone(),
            token1: token1.clone(),
            fee,
            sqrt_price_x64,
            liquidity: account.liquidity(),
            tick_current,
            observation_index: u16::from_le_bytes(account.observation_index),
            observation_cardinality: u16::from_le_bytes(account.observation_cardinality),
            observation_cardinality_next: u16::from_le_bytes(account.observation_cardinality_next),
            tick_cache,
        })
    }

    pub fn tick_spacing(&self) -> u16 {
        self.fee.tick_spacing()
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        *token == self.token0 || *token == self.token1
    }

    /// The pool's other token
    pub fn other_token(&self, token: &Token) -> ClmmResult<&Token> {
        if *token == self.token0 {
            Ok(&self.token1)
        } else if *token == self.token1 {
            Ok(&self.token0)
        } else {
            Err(ClmmError::TokenNotInPool)
        }
    }

    /// Swap direction when selling `token_in`
    pub fn zero_for_one(&self, token_in: &Token) -> ClmmResult<bool> {
        if *token_in == self.token0 {
            Ok(true)
        } else if *token_in == self.token1 {
            Ok(false)
        } else {
            Err(ClmmError::TokenNotInPool)
        }
    }

    /// Price of token0 in token1
    pub fn token0_price(&self) -> ClmmResult<Price> {
        let sqrt_price = U256::from(self.sqrt_price_x64);
        Price::new(
            self.token0.clone(),
            self.token1.clone(),
            sqrt_price * sqrt_price,
            U256::one() << 128,
        )
    }

    /// Price of token1 in token0
    pub fn token1_price(&self) -> ClmmResult<Price> {
        self.token0_price()?.invert()
    }

    /// Price of `token` in terms of the other pool token
    pub fn price_of(&self, token: &Token) -> ClmmResult<Price> {
        if *token == self.token0 {
            self.token0_price()
        } else if *token == self.token1 {
            self.token1_price()
        } else {
            Err(ClmmError::TokenNotInPool)
        }
    }

    /// Tick lookup through the pool's tick cache
    pub fn get_tick(&self, index: i32) -> ClmmResult<Tick> {
        self.tick_cache.get_tick(index)
    }

    pub fn tick_cache(&self) -> &Arc<TickDataCache> {
        &self.tick_cache
    }
}

/// What the UI knows about a pool at a point in time
#[derive(Debug, Clone, Default)]
pub enum PoolLoadState {
    #[default]
    Loading,
    NotExists,
    Exists(Arc<PoolState>),
    Invalid,
}

impl PoolLoadState {
    pub fn pool(&self) -> Option<&Arc<PoolState>> {
        match self {
            PoolLoadState::Exists(pool) => Some(pool),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;
    use crate::utils::pool_address;

    pub fn token(byte: u8, decimals: u8, symbol: &str) -> Token {
        Token::new(0, Pubkey::new_from_array([byte; 32]), decimals, symbol)
    }

    /// Pool snapshot decoded from freshly encoded account bytes
    pub fn pool(
        token_a: &Token,
        token_b: &Token,
        fee: FeeTier,
        tick_current: i32,
        liquidity: u128,
    ) -> PoolState {
        let config = EngineConfig::default();
        let (token0, token1) = sort_tokens(token_a, token_b).unwrap();
        let sqrt_price = crate::math::tick_math::get_sqrt_price_at_tick(tick_current).unwrap();
        let account = PoolAccount::new(
            &token0.address,
            &token1.address,
            fee,
            sqrt_price,
            liquidity,
            tick_current,
        );
        let address = pool_address(&config.program_id, token_a, token_b, fee).unwrap();
        PoolState::from_account(&config, address, token_a, token_b, &account.to_account_data())
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::{pool, token};
    use super::*;

    #[test]
    fn test_account_layout_offsets() {
        let t0 = Pubkey::new_from_array([1; 32]);
        let t1 = Pubkey::new_from_array([2; 32]);
        let account = PoolAccount::new(&t0, &t1, FeeTier::Medium, 1u128 << 64, 77, -5);
        let data = account.to_account_data();

        assert_eq!(data.len(), PoolAccount::LEN);
        assert_eq!(&data[8..40], &[1u8; 32]);
        assert_eq!(&data[40..72], &[2u8; 32]);
        assert_eq!(&data[72..76], &3000u32.to_be_bytes());
        assert_eq!(&data[76..92], &(1u128 << 64).to_le_bytes());
        assert_eq!(&data[92..108], &77u128.to_le_bytes());
        assert_eq!(&data[108..112], &(-5i32).to_le_bytes());
    }

    #[test]
    fn test_from_account_either_token_order() {
        let a = token(2, 6, "A");
        let b = token(1, 9, "B");
        let state = pool(&a, &b, FeeTier::Medium, 0, 1_000);
        assert_eq!(state.token0, b);
        assert_eq!(state.token1, a);
        assert_eq!(state.tick_spacing(), 60);
        assert_eq!(state.observation_cardinality, 1);
    }

    #[test]
    fn test_from_account_rejects_bad_data() {
        let config = EngineConfig::default();
        let a = token(1, 6, "A");
        let b = token(2, 6, "B");
        let c = token(3, 6, "C");
        let account = PoolAccount::new(&a.address, &b.address, FeeTier::Low, 1u128 << 64, 0, 0);
        let data = account.to_account_data();

        // Wrong pair
        assert_eq!(
            PoolState::from_account(&config, Pubkey::default(), &a, &c, &data).unwrap_err(),
            ClmmError::TokenNotInPool
        );

        // Truncated
        assert!(matches!(
            PoolState::from_account(&config, Pubkey::default(), &a, &b, &data[..50]),
            Err(ClmmError::InvalidAccountData(_))
        ));

        // Unknown fee
        let mut bad_fee = data.clone();
        bad_fee[72..76].copy_from_slice(&2500u32.to_be_bytes());
        assert_eq!(
            PoolState::from_account(&config, Pubkey::default(), &a, &b, &bad_fee).unwrap_err(),
            ClmmError::UnknownFeeTier(2500)
        );

        // Price below the minimum
        let mut bad_price = data;
        bad_price[76..92].copy_from_slice(&1u128.to_le_bytes());
        assert_eq!(
            PoolState::from_account(&config, Pubkey::default(), &a, &b, &bad_price).unwrap_err(),
            ClmmError::OutOfBoundsPrice(1)
        );
    }

    #[test]
    fn test_prices() {
        let a = token(1, 6, "A");
        let b = token(2, 6, "B");
        let c = token(3, 6, "C");
        // tick 6932 is just above price 2
        let state = pool(&a, &b, FeeTier::Medium, 6932, 1_000);

        let p0 = state.price_of(&a).unwrap();
        assert_eq!(p0.base, a);
        assert!((p0.to_f64().unwrap() - 2.0).abs() < 1e-3);

        let p1 = state.price_of(&b).unwrap();
        assert!((p1.to_f64().unwrap() - 0.5).abs() < 1e-3);

        assert_eq!(state.price_of(&c).unwrap_err(), ClmmError::TokenNotInPool);
    }

    #[test]
    fn test_token_queries() {
        let a = token(1, 6, "A");
        let b = token(2, 6, "B");
        let c = token(3, 6, "C");
        let state = pool(&a, &b, FeeTier::Medium, 0, 1_000);

        assert!(state.involves_token(&a));
        assert!(!state.involves_token(&c));
        assert_eq!(state.other_token(&a).unwrap(), &b);
        assert!(state.zero_for_one(&a).unwrap());
        assert!(!state.zero_for_one(&b).unwrap());
        assert_eq!(state.zero_for_one(&c), Err(ClmmError::TokenNotInPool));
    }

    #[test]
    fn test_get_tick_before_load() {
        let a = token(1, 6, "A");
        let b = token(2, 6, "B");
        let state = pool(&a, &b, FeeTier::Medium, 0, 1_000);
        assert_eq!(state.get_tick(0), Err(ClmmError::TickNotLoaded(0)));
    }
}
