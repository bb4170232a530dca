//! Bit Math
//!
//! Bit searching over 256-bit tick bitmap words.

use crate::math::full_math::U256;

/// Find the most significant bit (position of highest set bit)
/// Returns 0 for input 0
pub fn most_significant_bit(x: U256) -> u8 {
    if x.is_zero() {
        return 0;
    }
    (x.bits() - 1) as u8
}

/// Find the least significant bit (position of lowest set bit)
/// Returns 0 for input 0
pub fn least_significant_bit(x: U256) -> u8 {
    if x.is_zero() {
        return 0;
    }
    for (i, limb) in x.0.iter().enumerate() {
        if *limb != 0 {
            return (i as u32 * 64 + limb.trailing_zeros()) as u8;
        }
    }
    0
}

/// Find position of next set bit at or after position
/// Returns None if no bit is set at or after position
pub fn next_bit_position(bitmap: U256, position: u8) -> Option<u8> {
    let masked = bitmap & (U256::MAX << position as usize);
    if masked.is_zero() {
        None
    } else {
        Some(least_significant_bit(masked))
    }
}

/// Find position of previous set bit at or before position
/// Returns None if no bit is set at or before position
pub fn prev_bit_position(bitmap: U256, position: u8) -> Option<u8> {
    let masked = bitmap & (U256::MAX >> (255 - position as usize));
    if masked.is_zero() {
        None
    } else {
        Some(most_significant_bit(masked))
    }
}

/// Set a specific bit
#[inline]
pub fn set_bit(bitmap: U256, position: u8) -> U256 {
    bitmap | (U256::one() << position as usize)
}

/// Assemble a bitmap word from little-endian u64 limbs
pub fn word_from_limbs(limbs: [u64; 4]) -> U256 {
    U256(limbs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb() {
        assert_eq!(most_significant_bit(U256::zero()), 0);
        assert_eq!(most_significant_bit(U256::one()), 0);
        assert_eq!(most_significant_bit(U256::from(2)), 1);
        assert_eq!(most_significant_bit(U256::from(255)), 7);
        assert_eq!(most_significant_bit(U256::from(256)), 8);
        assert_eq!(most_significant_bit(U256::one() << 200), 200);
        assert_eq!(most_significant_bit(U256::MAX), 255);
    }

    #[test]
    fn test_lsb() {
        assert_eq!(least_significant_bit(U256::zero()), 0);
        assert_eq!(least_significant_bit(U256::one()), 0);
        assert_eq!(least_significant_bit(U256::from(8)), 3);
        assert_eq!(least_significant_bit(U256::one() << 130), 130);
        assert_eq!(least_significant_bit(U256::MAX), 0);
    }

    #[test]
    fn test_bit_operations() {
        let bitmap = set_bit(set_bit(U256::zero(), 1), 255);
        assert!(bitmap.bit(1) && bitmap.bit(255) && !bitmap.bit(0));
        assert_eq!(word_from_limbs([2, 0, 0, 1 << 63]), bitmap);
    }

    #[test]
    fn test_next_prev_bit() {
        // bits 2, 4 and 200 set
        let bitmap = set_bit(U256::from(0b10100u64), 200);

        assert_eq!(next_bit_position(bitmap, 0), Some(2));
        assert_eq!(next_bit_position(bitmap, 2), Some(2));
        assert_eq!(next_bit_position(bitmap, 3), Some(4));
        assert_eq!(next_bit_position(bitmap, 5), Some(200));
        assert_eq!(next_bit_position(bitmap, 201), None);

        assert_eq!(prev_bit_position(bitmap, 255), Some(200));
        assert_eq!(prev_bit_position(bitmap, 199), Some(4));
        assert_eq!(prev_bit_position(bitmap, 4), Some(4));
        assert_eq!(prev_bit_position(bitmap, 3), Some(2));
        assert_eq!(prev_bit_position(bitmap, 1), None);
    }
}
