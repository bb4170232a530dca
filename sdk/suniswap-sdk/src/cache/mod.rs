pub mod surrounding_ticks;
pub mod tick_cache;

pub use surrounding_ticks::*;
pub use tick_cache::*;
