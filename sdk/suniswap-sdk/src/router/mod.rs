//! Route enumeration and best-trade selection

pub mod combinations;
pub mod routes;
pub mod sequencer;
pub mod simulate;
pub mod trade;

pub use combinations::{candidate_pairs, candidate_pools};
pub use routes::{find_routes, Route};
pub use sequencer::{QuoteSequencer, QuoteTicket};
pub use simulate::{simulate_swap, SwapSimulation};
pub use trade::{Quoter, Trade, TradeType};
