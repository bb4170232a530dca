//! Best-trade selection
//!
//! Each candidate route is quoted as its own future: the tick windows of its
//! pools are loaded, then the amount is pushed through every hop with the
//! local swap simulator. All routes are awaited together and the best
//! surviving quote wins.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::errors::{ClmmError, Result};
use crate::ledger::{fetch_pools, LedgerReader};
use crate::math::full_math::U256;
use crate::router::combinations::candidate_pools;
use crate::router::routes::{find_routes, Route};
use crate::router::simulate::{simulate_swap, SwapSimulation};
use crate::state::pool::PoolState;
use crate::state::price::Price;
use crate::state::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeType {
    /// Sell exactly this much of the input token
    ExactInput(u64),
    /// Buy exactly this much of the output token
    ExactOutput(u64),
}

/// A quoted route with the amounts it moves
#[derive(Debug, Clone)]
pub struct Trade {
    pub route: Route,
    pub trade_type: TradeType,
    pub input_amount: u64,
    pub output_amount: u64,
    /// Per-hop simulation results in swap order
    pub hops: Vec<SwapSimulation>,
}

impl Trade {
    /// Strictly better quote for the same trade type
    fn beats(&self, other: &Trade) -> bool {
        match self.trade_type {
            TradeType::ExactInput(_) => self.output_amount > other.output_amount,
            TradeType::ExactOutput(_) => self.input_amount < other.input_amount,
        }
    }

    /// Average price paid, output per input in raw units
    pub fn execution_price(&self) -> Result<Price> {
        Price::new(
            self.route.input.clone(),
            self.route.output.clone(),
            U256::from(self.output_amount),
            U256::from(self.input_amount),
        )
    }
}

/// Route quoting against a ledger
pub struct Quoter {
    config: EngineConfig,
    reader: Arc<dyn LedgerReader>,
}

impl Quoter {
    pub fn new(config: EngineConfig, reader: Arc<dyn LedgerReader>) -> Self {
        Self { config, reader }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Existing pools among every candidate pair and fee tier for a swap
    /// between `token_a` and `token_b`, fetched in one batch
    pub async fn fetch_candidate_pools(
        &self,
        token_a: &Token,
        token_b: &Token,
    ) -> Result<Vec<Arc<PoolState>>> {
        let candidates = candidate_pools(token_a, token_b, &self.config.base_tokens);
        let states = fetch_pools(self.reader.as_ref(), &self.config, &candidates).await?;
        Ok(states
            .into_iter()
            .filter_map(|state| state.pool().cloned())
            .collect())
    }

    /// Routes through `pools` bounded by the configured hop limit
    pub fn routes(&self, token_in: &Token, token_out: &Token, pools: &[Arc<PoolState>]) -> Vec<Route> {
        find_routes(token_in, token_out, pools, self.config.max_hops)
    }

    /// Quote a single route
    pub async fn quote_route(&self, route: &Route, trade_type: TradeType) -> Result<Trade> {
        for pool in &route.pools {
            pool.tick_cache()
                .eager_load_cache(self.reader.as_ref(), pool.tick_current)
                .await?;
        }

        match trade_type {
            TradeType::ExactInput(amount_in) => {
                let mut amount = amount_in;
                let mut hops = Vec::with_capacity(route.hops());
                for (pool, token_in, _) in route.legs() {
                    let amount_specified =
                        i64::try_from(amount).map_err(|_| ClmmError::AmountOverflow)?;
                    let hop = simulate_swap(pool, pool.zero_for_one(token_in)?, amount_specified, None)?;
                    if hop.amount_out == 0 {
                        return Err(ClmmError::InsufficientLiquidity);
                    }
                    amount = hop.amount_out;
                    hops.push(hop);
                }
                Ok(Trade {
                    route: route.clone(),
                    trade_type,
                    input_amount: amount_in,
                    output_amount: amount,
                    hops,
                })
            }
            TradeType::ExactOutput(amount_out) => {
                // Walk backwards: each hop must produce what the next one consumes
                let mut amount = amount_out;
                let mut hops = Vec::with_capacity(route.hops());
                for (pool, token_in, _) in route.legs().rev() {
                    let amount_specified =
                        i64::try_from(amount).map_err(|_| ClmmError::AmountOverflow)?;
                    let hop = simulate_swap(pool, pool.zero_for_one(token_in)?, -amount_specified, None)?;
                    amount = hop.amount_in;
                    hops.push(hop);
                }
                hops.reverse();
                Ok(Trade {
                    route: route.clone(),
                    trade_type,
                    input_amount: amount,
                    output_amount: amount_out,
                    hops,
                })
            }
        }
    }

    /// Quote every route concurrently and keep the best
    ///
    /// Exact input maximises output, exact output minimises input. Ties keep
    /// the route listed first. Failing routes are dropped.
    pub async fn best_trade(&self, routes: &[Route], trade_type: TradeType) -> Result<Trade> {
        if routes.is_empty() {
            return Err(ClmmError::NoRouteFound);
        }
        if matches!(
            trade_type,
            TradeType::ExactInput(0) | TradeType::ExactOutput(0)
        ) {
            return Err(ClmmError::ZeroAmount);
        }

        let quotes = join_all(routes.iter().map(|route| self.quote_route(route, trade_type))).await;

        let mut best: Option<Trade> = None;
        let mut other_error = None;
        for (route, quote) in routes.iter().zip(quotes) {
            match quote {
                Ok(trade) => {
                    debug!(
                        %route,
                        input = trade.input_amount,
                        output = trade.output_amount,
                        "route quoted"
                    );
                    if best.as_ref().map_or(true, |current| trade.beats(current)) {
                        best = Some(trade);
                    }
                }
                Err(err) => {
                    warn!(%route, error = %err, "route dropped");
                    if err != ClmmError::InsufficientLiquidity && other_error.is_none() {
                        other_error = Some(err);
                    }
                }
            }
        }

        match best {
            Some(trade) => {
                info!(
                    route = %trade.route,
                    input = trade.input_amount,
                    output = trade.output_amount,
                    candidates = routes.len(),
                    "selected best trade"
                );
                Ok(trade)
            }
            None => Err(other_error.unwrap_or(ClmmError::InsufficientLiquidity)),
        }
    }

    /// Fetch candidate pools, enumerate routes and pick the best trade
    pub async fn best_trade_between(
        &self,
        token_in: &Token,
        token_out: &Token,
        trade_type: TradeType,
    ) -> Result<Trade> {
        let pools = self.fetch_candidate_pools(token_in, token_out).await?;
        let routes = self.routes(token_in, token_out, &pools);
        self.best_trade(&routes, trade_type).await
    }
}
