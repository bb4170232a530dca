//! SuniSwap SDK - off-chain mirror of the SuniSwap concentrated liquidity math
//!
//! Quotes swaps and previews positions before a transaction is built.
//!
//! ## Architecture
//!
//! - **Math**: Q64.64 tick/price conversion, liquidity and swap-step math
//! - **Addresses**: Deterministic PDAs for pools, ticks, bitmap words and positions
//! - **State**: Immutable pool snapshots decoded from fetched account bytes
//! - **Cache**: Lazily loaded tick windows and depth chart data
//! - **Router**: Multi-hop route enumeration and best-trade selection
//!
//! All arithmetic is checked. Nothing here signs or submits transactions.

use anchor_lang::prelude::*;

pub mod cache;
pub mod config;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod math;
pub mod position_calculator;
pub mod router;
pub mod state;
pub mod utils;

pub use cache::{surrounding_ticks, surrounding_ticks_for_pool, TickDataCache, TickProcessed};
pub use config::EngineConfig;
pub use errors::{ClmmError, Result};
pub use ledger::{fetch_pool, fetch_pools, InMemoryLedger, LedgerReader};
pub use position_calculator::{KnownAmount, PositionCalculator, PositionQuote};
pub use router::{
    candidate_pairs, find_routes, simulate_swap, QuoteSequencer, QuoteTicket, Quoter, Route, Trade,
    TradeType,
};
pub use state::{FeeTier, PoolLoadState, PoolState, Position, Price, Tick, Token};

declare_id!("859DmKSfDQxnHY7dbYdFNwUE7QWhnb1WiBbXwbq1ktky");
