pub mod bit_math;
pub mod decimal_scale;
pub mod full_math;
pub mod liquidity_math;
pub mod price_math;
pub mod sqrt_price_math;
pub mod swap_math;
pub mod tick_math;

pub use decimal_scale::*;
pub use full_math::*;
pub use liquidity_math::*;
pub use price_math::*;
pub use sqrt_price_math::*;
pub use swap_math::*;
pub use tick_math::*;
