mod common;

use std::sync::Arc;

use common::{init_tracing, token, TestLedger, LIQUIDITY};
use suniswap_sdk::{
    fetch_pool, surrounding_ticks_for_pool, ClmmError, EngineConfig, FeeTier, PoolState, Quoter,
    Route, TradeType,
};

async fn pool(env: &TestLedger, a: &suniswap_sdk::Token, b: &suniswap_sdk::Token, fee: FeeTier) -> Arc<PoolState> {
    fetch_pool(env.ledger.as_ref(), &env.config, a, b, fee)
        .await
        .unwrap()
        .pool()
        .unwrap()
        .clone()
}

#[tokio::test]
async fn test_shared_pool_loaded_once() {
    init_tracing();
    let a = token(1, 6, "A");
    let b = token(2, 6, "B");
    let c = token(3, 6, "C");

    let env = TestLedger::new(EngineConfig::default());
    env.add_pool(&a, &b, FeeTier::Medium, 0, LIQUIDITY, 10);
    env.add_pool(&b, &c, FeeTier::Medium, 0, LIQUIDITY, 10);
    env.add_pool(&b, &c, FeeTier::Low, 0, LIQUIDITY, 10);

    let ab = pool(&env, &a, &b, FeeTier::Medium).await;
    let bc = pool(&env, &b, &c, FeeTier::Medium).await;
    let bc_low = pool(&env, &b, &c, FeeTier::Low).await;
    let routes = vec![
        Route::new(vec![ab.clone(), bc], a.clone(), c.clone()).unwrap(),
        Route::new(vec![ab.clone(), bc_low], a.clone(), c.clone()).unwrap(),
    ];

    let quoter = Quoter::new(env.config.clone(), env.ledger.clone());
    let before = env.ledger.fetch_count();
    quoter
        .best_trade(&routes, TradeType::ExactInput(1_000_000))
        .await
        .unwrap();

    // Three pools, each 5 bitmap words and 2 initialized ticks
    assert_eq!(env.ledger.fetch_count() - before, 3 * (5 + 2));
    assert_eq!(ab.tick_cache().loaded_words(), vec![-2, -1, 0, 1, 2]);

    // Quoting again is served from the caches
    let again = env.ledger.fetch_count();
    quoter
        .best_trade(&routes, TradeType::ExactOutput(1_000))
        .await
        .unwrap();
    assert_eq!(env.ledger.fetch_count(), again);
}

#[tokio::test]
async fn test_depth_chart_from_ledger() {
    init_tracing();
    let a = token(1, 6, "A");
    let b = token(2, 6, "B");

    let env = TestLedger::new(EngineConfig::default());
    env.add_pool_with_ticks(&a, &b, FeeTier::Medium, -30, 10, &[(-60, 5), (0, -5)]);

    let state = pool(&env, &a, &b, FeeTier::Medium).await;
    // Nothing loaded yet: no pivot
    assert_eq!(
        surrounding_ticks_for_pool(&state),
        Err(ClmmError::PivotNotFound(-30))
    );

    state
        .tick_cache()
        .eager_load_cache(env.ledger.as_ref(), state.tick_current)
        .await
        .unwrap();
    let chart = surrounding_ticks_for_pool(&state).unwrap();
    let points: Vec<(i32, u128)> = chart.iter().map(|t| (t.tick_idx, t.liquidity_active)).collect();
    assert_eq!(points, vec![(-60, 10), (0, 5)]);
}

#[tokio::test]
async fn test_lookup_outside_window() {
    let a = token(1, 6, "A");
    let b = token(2, 6, "B");

    let env = TestLedger::new(EngineConfig {
        tick_window_words: 1,
        ..EngineConfig::default()
    });
    env.add_pool(&a, &b, FeeTier::Medium, 0, LIQUIDITY, 10);

    let state = pool(&env, &a, &b, FeeTier::Medium).await;
    state
        .tick_cache()
        .eager_load_cache(env.ledger.as_ref(), 0)
        .await
        .unwrap();

    assert_eq!(state.get_tick(600).unwrap().liquidity_net, -(LIQUIDITY as i128));
    let far = 60 * 256 * 3;
    assert_eq!(state.get_tick(far), Err(ClmmError::TickNotLoaded(far)));
}
