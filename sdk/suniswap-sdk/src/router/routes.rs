use std::fmt;
use std::sync::Arc;

use crate::errors::{ClmmError, Result};
use crate::state::pool::PoolState;
use crate::state::token::Token;

/// Ordered chain of pools from `input` to `output`
#[derive(Debug, Clone)]
pub struct Route {
    pub pools: Vec<Arc<PoolState>>,
    /// `pools.len() + 1` tokens, `input` first and `output` last
    pub token_path: Vec<Token>,
    pub input: Token,
    pub output: Token,
}

impl Route {
    /// Chain `pools` starting from `input`; each pool must hold the token
    /// the previous hop produced and the last must produce `output`
    pub fn new(pools: Vec<Arc<PoolState>>, input: Token, output: Token) -> Result<Self> {
        if pools.is_empty() {
            return Err(ClmmError::NoRouteFound);
        }
        let mut token_path = Vec::with_capacity(pools.len() + 1);
        token_path.push(input.clone());
        for pool in &pools {
            let next = pool.other_token(&token_path[token_path.len() - 1])?.clone();
            token_path.push(next);
        }
        if token_path[token_path.len() - 1] != output {
            return Err(ClmmError::TokenNotInPool);
        }
        Ok(Self {
            pools,
            token_path,
            input,
            output,
        })
    }

    pub fn hops(&self) -> usize {
        self.pools.len()
    }

    /// Pool, token in and token out of each hop in swap order
    pub fn legs(&self) -> impl DoubleEndedIterator<Item = (&Arc<PoolState>, &Token, &Token)> + '_ {
        self.pools
            .iter()
            .zip(self.token_path.windows(2))
            .map(|(pool, pair)| (pool, &pair[0], &pair[1]))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.input)?;
        for (pool, _, token_out) in self.legs() {
            write!(f, " -[{}]-> {}", pool.fee.fee_rate(), token_out)?;
        }
        Ok(())
    }
}

/// Every simple path of at most `max_hops` pools from `token_in` to
/// `token_out`, in depth-first discovery order
pub fn find_routes(
    token_in: &Token,
    token_out: &Token,
    pools: &[Arc<PoolState>],
    max_hops: usize,
) -> Vec<Route> {
    let mut routes = Vec::new();
    if token_in == token_out || max_hops == 0 {
        return routes;
    }
    let mut path = Vec::with_capacity(max_hops);
    let mut used = vec![false; pools.len()];
    extend_routes(
        token_in,
        token_in,
        token_out,
        pools,
        max_hops,
        &mut used,
        &mut path,
        &mut routes,
    );
    routes
}

#[allow(clippy::too_many_arguments)]
fn extend_routes(
    token_in: &Token,
    frontier: &Token,
    token_out: &Token,
    pools: &[Arc<PoolState>],
    max_hops: usize,
    used: &mut [bool],
    path: &mut Vec<Arc<PoolState>>,
    routes: &mut Vec<Route>,
) {
    for (index, pool) in pools.iter().enumerate() {
        if used[index] || !pool.involves_token(frontier) {
            continue;
        }
        let Ok(next) = pool.other_token(frontier) else {
            continue;
        };

        path.push(pool.clone());
        if next == token_out {
            if let Ok(route) = Route::new(path.clone(), token_in.clone(), token_out.clone()) {
                routes.push(route);
            }
        } else if path.len() < max_hops && next != token_in {
            used[index] = true;
            extend_routes(token_in, next, token_out, pools, max_hops, used, path, routes);
            used[index] = false;
        }
        path.pop();
    }
}
