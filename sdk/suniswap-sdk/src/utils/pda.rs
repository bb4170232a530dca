//! Program address derivation
//!
//! Seeds: [tag, token0, token1, fee (4 bytes BE), index (BE)?]
//! The raw derivation does not reorder tokens, the helpers below do.

use anchor_lang::prelude::Pubkey;

use crate::constants::seeds;
use crate::errors::Result;
use crate::state::fee_tier::FeeTier;
use crate::state::token::Token;
use crate::utils::sort_tokens;

/// Optional trailing index seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedIndex {
    /// Tick index, 4 bytes big-endian
    Tick(i32),
    /// Bitmap word index, 2 bytes big-endian
    Word(i16),
    /// Observation index, 2 bytes big-endian
    Observation(u16),
}

impl SeedIndex {
    pub fn to_be_bytes(self) -> Vec<u8> {
        match self {
            SeedIndex::Tick(tick) => tick.to_be_bytes().to_vec(),
            SeedIndex::Word(word) => word.to_be_bytes().to_vec(),
            SeedIndex::Observation(index) => index.to_be_bytes().to_vec(),
        }
    }
}

/// Derive a program address from a seed tag, a token pair, a fee tier and
/// an optional index. Tokens are used in the order given.
pub fn derive_address(
    program_id: &Pubkey,
    seed_tag: &[u8],
    token0: &Pubkey,
    token1: &Pubkey,
    fee: FeeTier,
    extra: Option<SeedIndex>,
) -> (Pubkey, u8) {
    let fee_bytes = fee.fee_rate().to_be_bytes();
    let extra_bytes = extra.map(SeedIndex::to_be_bytes);

    let mut seed_list: Vec<&[u8]> = vec![seed_tag, token0.as_ref(), token1.as_ref(), &fee_bytes];
    if let Some(extra_bytes) = extra_bytes.as_deref() {
        seed_list.push(extra_bytes);
    }
    Pubkey::find_program_address(&seed_list, program_id)
}

fn derive_canonical(
    program_id: &Pubkey,
    seed_tag: &[u8],
    token_a: &Token,
    token_b: &Token,
    fee: FeeTier,
    extra: Option<SeedIndex>,
) -> Result<Pubkey> {
    let (token0, token1) = sort_tokens(token_a, token_b)?;
    Ok(derive_address(program_id, seed_tag, &token0.address, &token1.address, fee, extra).0)
}

/// Pool PDA: ["pool", token0, token1, fee]
pub fn pool_address(
    program_id: &Pubkey,
    token_a: &Token,
    token_b: &Token,
    fee: FeeTier,
) -> Result<Pubkey> {
    derive_canonical(program_id, seeds::POOL_SEED, token_a, token_b, fee, None)
}

/// Tick PDA: ["tick", token0, token1, fee, tick_index]
pub fn tick_address(
    program_id: &Pubkey,
    token_a: &Token,
    token_b: &Token,
    fee: FeeTier,
    tick_index: i32,
) -> Result<Pubkey> {
    derive_canonical(
        program_id,
        seeds::TICK_SEED,
        token_a,
        token_b,
        fee,
        Some(SeedIndex::Tick(tick_index)),
    )
}

/// Bitmap word PDA: ["tick_bitmap", token0, token1, fee, word_index]
pub fn tick_bitmap_address(
    program_id: &Pubkey,
    token_a: &Token,
    token_b: &Token,
    fee: FeeTier,
    word_index: i16,
) -> Result<Pubkey> {
    derive_canonical(
        program_id,
        seeds::TICK_BITMAP_SEED,
        token_a,
        token_b,
        fee,
        Some(SeedIndex::Word(word_index)),
    )
}

/// Price observation PDA: ["observation", token0, token1, fee, index]
pub fn observation_address(
    program_id: &Pubkey,
    token_a: &Token,
    token_b: &Token,
    fee: FeeTier,
    index: u16,
) -> Result<Pubkey> {
    derive_canonical(
        program_id,
        seeds::OBSERVATION_SEED,
        token_a,
        token_b,
        fee,
        Some(SeedIndex::Observation(index)),
    )
}

/// Position PDA: ["position", owner, token0, token1, fee, tick_lower, tick_upper]
pub fn position_address(
    program_id: &Pubkey,
    owner: &Pubkey,
    token_a: &Token,
    token_b: &Token,
    fee: FeeTier,
    tick_lower: i32,
    tick_upper: i32,
) -> Result<Pubkey> {
    let (token0, token1) = sort_tokens(token_a, token_b)?;
    let fee_bytes = fee.fee_rate().to_be_bytes();
    let lower_bytes = tick_lower.to_be_bytes();
    let upper_bytes = tick_upper.to_be_bytes();

    let (address, _bump) = Pubkey::find_program_address(
        &[
            seeds::POSITION_SEED,
            owner.as_ref(),
            token0.address.as_ref(),
            token1.address.as_ref(),
            &fee_bytes,
            &lower_bytes,
            &upper_bytes,
        ],
        program_id,
    );
    Ok(address)
}
