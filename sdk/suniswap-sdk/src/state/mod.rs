pub mod fee_tier;
pub mod pool;
pub mod position;
pub mod price;
pub mod tick;
pub mod tick_bitmap;
pub mod token;

pub use fee_tier::*;
pub use pool::*;
pub use position::*;
pub use price::*;
pub use tick::*;
pub use tick_bitmap::*;
pub use token::*;
