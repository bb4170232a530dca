//! Tick Math
//!
//! Converts between tick indices and sqrt prices.
//! Based on Uniswap V3's TickMath library, producing Q64.64 sqrt prices.
//!
//! tick = log_{1.0001}(price) = log(price) / log(1.0001)
//! sqrt_price = sqrt(1.0001^tick) = 1.0001^(tick/2)

use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::errors::{ClmmError, Result};
use crate::math::full_math::U256;

/// 1/sqrt(1.0001)^(2^i) in Q128.128, for i in 0..19
const RATIO_MAGIC: [u128; 19] = [
    0xfffcb933bd6fad37aa2d162d1a594001, // 2^0
    0xfff97272373d413259a46990580e213a, // 2^1
    0xfff2e50f5f656932ef12357cf3c7fdcc, // 2^2
    0xffe5caca7e10e4e61c3624eaa0941cd0, // 2^3
    0xffcb9843d60f6159c9db58835c926644, // 2^4
    0xff973b41fa98c081472e6896dfb254c0, // 2^5
    0xff2ea16466c96a3843ec78b326b52861, // 2^6
    0xfe5dee046a99a2a811c461f1969c3053, // 2^7
    0xfcbe86c7900a88aedcffc83b479aa3a4, // 2^8
    0xf987a7253ac413176f2b074cf7815e54, // 2^9
    0xf3392b0822b70005940c7a398e4b70f3, // 2^10
    0xe7159475a2c29b7443b29c7fa6e889d9, // 2^11
    0xd097f3bdfd2022b8845ad8f792aa5825, // 2^12
    0xa9f746462d870fdf8a65dc1f90e061e5, // 2^13
    0x70d869a156d2a1b890bb3df62baf32f7, // 2^14
    0x31be135f97d08fd981231505542fcfa6, // 2^15
    0x9aa508b5b7a84e1c677de54f3e99bc9,  // 2^16
    0x5d6af8dedb81196699c329225ee604,   // 2^17
    0x2216e584f5fa1ea926041bedfe98,     // 2^18
];

/// Get sqrt price at a given tick
/// sqrt_price_x64 = sqrt(1.0001^tick) * 2^64
///
/// Uses binary representation of tick to compute efficiently:
/// 1.0001^tick = product of 1.0001^(2^i) for each bit i set in tick
pub fn get_sqrt_price_at_tick(tick: i32) -> Result<u128> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(ClmmError::OutOfBoundsTick(tick));
    }

    let abs_tick = tick.unsigned_abs();

    // ratio = 1/sqrt(1.0001)^|tick| in Q128.128
    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(RATIO_MAGIC[0])
    } else {
        U256::one() << 128
    };
    for (bit, magic) in RATIO_MAGIC.iter().enumerate().skip(1) {
        if abs_tick & (1u32 << bit) != 0 {
            ratio = (ratio * U256::from(*magic)) >> 128;
        }
    }

    // The magic numbers give 1.0001^(-|tick|/2); positive ticks need the reciprocal
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.64, rounding up so the result never undershoots the tick
    let rounding = if (ratio & U256::from(u64::MAX)).is_zero() { 0 } else { 1 };
    Ok((ratio >> 64).low_u128() + rounding)
}

/// Get tick at a given sqrt price
/// tick = floor(log_{1.0001}(sqrt_price^2))
///
/// Returns the greatest tick whose sqrt price is <= the input, so
/// get_sqrt_price_at_tick(get_tick_at_sqrt_price(x)) <= x always holds.
pub fn get_tick_at_sqrt_price(sqrt_price_x64: u128) -> Result<i32> {
    if !(MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price_x64) {
        return Err(ClmmError::OutOfBoundsPrice(sqrt_price_x64));
    }

    // Binary search for the last tick whose sqrt price does not exceed the target
    let mut low = MIN_TICK;
    let mut high = MAX_TICK;

    while low < high {
        // upper mid so the loop always makes progress
        let mid = low + (high - low + 1) / 2;
        if get_sqrt_price_at_tick(mid)? <= sqrt_price_x64 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Ok(low)
}

/// floor(tick / spacing), rounding toward negative infinity
pub fn compress_tick(tick: i32, tick_spacing: u16) -> i32 {
    tick.div_euclid(tick_spacing as i32)
}

/// Smallest and largest ticks that are multiples of `tick_spacing`
pub fn usable_tick_bounds(tick_spacing: u16) -> (i32, i32) {
    let spacing = tick_spacing as i32;
    let min = -((-MIN_TICK) / spacing) * spacing;
    let max = (MAX_TICK / spacing) * spacing;
    (min, max)
}

/// Round a tick to the nearest multiple of `tick_spacing`, clamped to the usable range
///
/// Halfway ticks round away from zero.
pub fn nearest_usable_tick(tick: i32, tick_spacing: u16) -> i32 {
    let spacing = tick_spacing.max(1) as i32;
    let quotient = tick / spacing;
    let remainder = tick % spacing;

    let rounded = if remainder.abs() * 2 >= spacing {
        (quotient + remainder.signum()) * spacing
    } else {
        quotient * spacing
    };

    let (min, max) = usable_tick_bounds(spacing as u16);
    rounded.clamp(min, max)
}

/// Check that a range is ordered, in bounds and aligned to the spacing
pub fn check_tick_range(tick_lower: i32, tick_upper: i32, tick_spacing: u16) -> Result<()> {
    if tick_lower >= tick_upper {
        return Err(ClmmError::InvalidRange(tick_lower, tick_upper));
    }
    for tick in [tick_lower, tick_upper] {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(ClmmError::OutOfBoundsTick(tick));
        }
        if tick % tick_spacing as i32 != 0 {
            return Err(ClmmError::TickNotAligned { tick, spacing: tick_spacing });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;
    use proptest::prelude::*;

    #[test]
    fn test_sqrt_price_at_tick_zero() {
        // At tick 0, price = 1, sqrt_price = 1 * 2^64
        assert_eq!(get_sqrt_price_at_tick(0).unwrap(), Q64);
    }

    #[test]
    fn test_tick_bounds() {
        assert_eq!(get_sqrt_price_at_tick(MIN_TICK).unwrap(), MIN_SQRT_PRICE_X64);
        assert_eq!(get_sqrt_price_at_tick(MAX_TICK).unwrap(), MAX_SQRT_PRICE_X64);

        assert_eq!(
            get_sqrt_price_at_tick(MIN_TICK - 1),
            Err(ClmmError::OutOfBoundsTick(MIN_TICK - 1))
        );
        assert_eq!(
            get_sqrt_price_at_tick(MAX_TICK + 1),
            Err(ClmmError::OutOfBoundsTick(MAX_TICK + 1))
        );
    }

    #[test]
    fn test_sqrt_price_bounds() {
        assert_eq!(get_tick_at_sqrt_price(MIN_SQRT_PRICE_X64).unwrap(), MIN_TICK);
        assert_eq!(get_tick_at_sqrt_price(MAX_SQRT_PRICE_X64).unwrap(), MAX_TICK);
        assert!(get_tick_at_sqrt_price(MIN_SQRT_PRICE_X64 - 1).is_err());
        assert!(get_tick_at_sqrt_price(MAX_SQRT_PRICE_X64 + 1).is_err());
    }

    #[test]
    fn test_tick_at_price_floors() {
        // Just below the tick-1 boundary still belongs to tick 0
        let sp_1 = get_sqrt_price_at_tick(1).unwrap();
        assert_eq!(get_tick_at_sqrt_price(sp_1 - 1).unwrap(), 0);
        assert_eq!(get_tick_at_sqrt_price(sp_1).unwrap(), 1);
        // Just below tick 0 is tick -1
        assert_eq!(get_tick_at_sqrt_price(Q64 - 1).unwrap(), -1);
    }

    #[test]
    fn test_sqrt_prices_at_various_ticks() {
        // Tick 200: price = 1.0001^200 ~= 1.0202, sqrt ~= 1.01005
        let ratio_200 = get_sqrt_price_at_tick(200).unwrap() as f64 / Q64 as f64;
        assert!((ratio_200 - 1.01005).abs() < 0.0001);

        // Tick -200: sqrt ~= 0.99005
        let ratio_neg200 = get_sqrt_price_at_tick(-200).unwrap() as f64 / Q64 as f64;
        assert!((ratio_neg200 - 0.99005).abs() < 0.0001);
    }

    #[test]
    fn test_nearest_usable_tick() {
        assert_eq!(nearest_usable_tick(29, 60), 0);
        assert_eq!(nearest_usable_tick(30, 60), 60);
        assert_eq!(nearest_usable_tick(-29, 60), 0);
        assert_eq!(nearest_usable_tick(-30, 60), -60);
        assert_eq!(nearest_usable_tick(MAX_TICK, 60), 443580);
        assert_eq!(nearest_usable_tick(MIN_TICK, 60), -443580);
        assert_eq!(nearest_usable_tick(MAX_TICK, 1), MAX_TICK);
    }

    #[test]
    fn test_check_tick_range() {
        assert!(check_tick_range(-60, 60, 60).is_ok());
        assert_eq!(check_tick_range(60, 60, 60), Err(ClmmError::InvalidRange(60, 60)));
        assert_eq!(
            check_tick_range(-61, 60, 60),
            Err(ClmmError::TickNotAligned { tick: -61, spacing: 60 })
        );
    }

    proptest! {
        #[test]
        fn prop_round_trip(tick in MIN_TICK..=MAX_TICK) {
            let sqrt_price = get_sqrt_price_at_tick(tick).unwrap();
            prop_assert_eq!(get_tick_at_sqrt_price(sqrt_price).unwrap(), tick);
        }

        #[test]
        fn prop_strictly_increasing(tick in MIN_TICK..MAX_TICK) {
            prop_assert!(get_sqrt_price_at_tick(tick).unwrap() < get_sqrt_price_at_tick(tick + 1).unwrap());
        }

        #[test]
        fn prop_floor_never_overshoots(sqrt_price in MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64) {
            let tick = get_tick_at_sqrt_price(sqrt_price).unwrap();
            prop_assert!(get_sqrt_price_at_tick(tick).unwrap() <= sqrt_price);
            if tick < MAX_TICK {
                prop_assert!(get_sqrt_price_at_tick(tick + 1).unwrap() > sqrt_price);
            }
        }

        #[test]
        fn prop_nearest_usable_tick_in_range(
            tick in MIN_TICK..=MAX_TICK,
            spacing in prop::sample::select(vec![1u16, 10, 60, 200]),
        ) {
            let usable = nearest_usable_tick(tick, spacing);
            prop_assert_eq!(usable % spacing as i32, 0);
            prop_assert!((MIN_TICK..=MAX_TICK).contains(&usable));
        }
    }
}
