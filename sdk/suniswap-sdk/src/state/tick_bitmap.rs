use anchor_lang::prelude::*;

use crate::errors::ClmmError;
use crate::math::bit_math::{set_bit, word_from_limbs};
use crate::math::full_math::U256;
use crate::math::tick_math::compress_tick;

/// One 256-bit word of the tick bitmap
/// Bit `b` of word `w` is set when compressed tick `w * 256 + b` is initialized
/// PDA: ["tick_bitmap", token0, token1, fee.to_be_bytes(), word_index.to_be_bytes()]
#[account]
#[derive(Debug, Default)]
pub struct TickBitmapAccount {
    pub word_index: i16,
    /// Little-endian limbs, bit 0 of limb 0 is bit 0 of the word
    pub bitmap: [u64; 4],
}

impl TickBitmapAccount {
    pub const LEN: usize = 8 +  // discriminator
        2 +                     // word_index
        32;                     // bitmap

    pub fn decode(data: &[u8]) -> std::result::Result<Self, ClmmError> {
        let mut slice = data;
        Self::try_deserialize(&mut slice)
            .map_err(|e| ClmmError::InvalidAccountData(format!("tick bitmap: {e}")))
    }

    pub fn encode(&self) -> std::result::Result<Vec<u8>, ClmmError> {
        let mut data = Vec::with_capacity(Self::LEN);
        self.try_serialize(&mut data)
            .map_err(|e| ClmmError::InvalidAccountData(format!("tick bitmap: {e}")))?;
        Ok(data)
    }

    pub fn word(&self) -> U256 {
        word_from_limbs(self.bitmap)
    }

    /// Build a word account from the compressed bit positions that are set
    pub fn from_bits(word_index: i16, bits: &[u8]) -> Self {
        let word = bits.iter().fold(U256::zero(), |word, bit| set_bit(word, *bit));
        Self {
            word_index,
            bitmap: word.0,
        }
    }
}

/// Word and bit position of a compressed tick
pub fn tick_bitmap_position(compressed: i32) -> (i16, u8) {
    ((compressed >> 8) as i16, (compressed & 0xff) as u8)
}

/// Bitmap word holding `tick`: floor(tick / spacing) >> 8
pub fn tick_bitmap_word_index(tick: i32, tick_spacing: u16) -> i16 {
    tick_bitmap_position(compress_tick(tick, tick_spacing)).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_index() {
        assert_eq!(tick_bitmap_word_index(0, 60), 0);
        assert_eq!(tick_bitmap_word_index(255 * 60, 60), 0);
        assert_eq!(tick_bitmap_word_index(256 * 60, 60), 1);
        // Floor division: -1 compresses to -1, which lives in word -1
        assert_eq!(tick_bitmap_word_index(-1, 60), -1);
        assert_eq!(tick_bitmap_word_index(-60, 60), -1);
        assert_eq!(tick_bitmap_word_index(-256 * 60, 60), -1);
        assert_eq!(tick_bitmap_word_index(-256 * 60 - 60, 60), -2);
        assert_eq!(tick_bitmap_word_index(443636, 1), 1732);
    }

    #[test]
    fn test_bitmap_position() {
        assert_eq!(tick_bitmap_position(0), (0, 0));
        assert_eq!(tick_bitmap_position(257), (1, 1));
        assert_eq!(tick_bitmap_position(-1), (-1, 255));
        assert_eq!(tick_bitmap_position(-256), (-1, 0));
    }

    #[test]
    fn test_bitmap_account_round_trip() {
        let account = TickBitmapAccount::from_bits(-1, &[0, 70, 255]);
        let decoded = TickBitmapAccount::decode(&account.encode().unwrap()).unwrap();
        assert_eq!(decoded.word_index, -1);
        let word = decoded.word();
        assert!(word.bit(0) && word.bit(70) && word.bit(255));
        assert!(!word.bit(1));
    }
}
