use std::collections::HashSet;

use crate::state::fee_tier::FeeTier;
use crate::state::token::Token;
use crate::utils::sort_tokens;

/// Token pairs whose pools could appear on a route between `token_a` and
/// `token_b` through the intermediary `bases`
///
/// Covers the direct pair, each side against each base and every pair of
/// bases. Pairs are canonical (token0, token1), unique and never identical.
pub fn candidate_pairs(token_a: &Token, token_b: &Token, bases: &[Token]) -> Vec<(Token, Token)> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    let mut push = |x: &Token, y: &Token| {
        if let Ok((token0, token1)) = sort_tokens(x, y) {
            let pair = (token0.clone(), token1.clone());
            if seen.insert(pair.clone()) {
                pairs.push(pair);
            }
        }
    };

    push(token_a, token_b);
    for base in bases {
        push(token_a, base);
        push(token_b, base);
    }
    for (i, base_x) in bases.iter().enumerate() {
        for base_y in &bases[i + 1..] {
            push(base_x, base_y);
        }
    }
    pairs
}

/// Every candidate pair under every fee tier, ready for a pool multi-fetch
pub fn candidate_pools(
    token_a: &Token,
    token_b: &Token,
    bases: &[Token],
) -> Vec<(Token, Token, FeeTier)> {
    candidate_pairs(token_a, token_b, bases)
        .into_iter()
        .flat_map(|(token0, token1)| {
            FeeTier::ALL
                .into_iter()
                .map(move |fee| (token0.clone(), token1.clone(), fee))
        })
        .collect()
}
