use thiserror::Error;

/// SuniSwap SDK errors
/// One variant per failure mode so the UI can tell them apart
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClmmError {
    // ═══════════════════════════════════════════════════════════════════════
    // MATH ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Arithmetic overflow in checked operation
    #[error("Math overflow")]
    MathOverflow,

    /// Division by zero attempted
    #[error("Division by zero")]
    DivisionByZero,

    /// Liquidity or token amount does not fit its integer width
    #[error("Amount overflow")]
    AmountOverflow,

    /// Running active liquidity went below zero
    #[error("Liquidity underflow at tick {0}")]
    LiquidityUnderflow(i32),

    // ═══════════════════════════════════════════════════════════════════════
    // TICK / PRICE ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Tick outside [MIN_TICK, MAX_TICK]
    #[error("Tick {0} out of bounds")]
    OutOfBoundsTick(i32),

    /// Sqrt price outside [MIN_SQRT_PRICE_X64, MAX_SQRT_PRICE_X64]
    #[error("Sqrt price {0} out of bounds")]
    OutOfBoundsPrice(u128),

    /// Lower tick must be less than upper tick
    #[error("Invalid tick range [{0}, {1})")]
    InvalidRange(i32, i32),

    /// Tick is not aligned to tick spacing
    #[error("Tick {tick} not aligned to spacing {spacing}")]
    TickNotAligned { tick: i32, spacing: u16 },

    // ═══════════════════════════════════════════════════════════════════════
    // TOKEN / POOL ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Both sides of a pair are the same token
    #[error("Identical tokens")]
    IdenticalTokens,

    /// Token is not one of the pool's two tokens
    #[error("Token not in pool")]
    TokenNotInPool,

    /// Fee is not one of the static fee tiers
    #[error("Unknown fee tier {0}")]
    UnknownFeeTier(u32),

    /// The range cannot hold the side the caller supplied
    #[error("Amount not accepted for this range")]
    AmountNotAccepted,

    /// Swap or deposit amount is zero
    #[error("Zero amount")]
    ZeroAmount,

    // ═══════════════════════════════════════════════════════════════════════
    // CACHE ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Tick lies outside the window loaded by the tick cache
    #[error("Tick {0} not loaded")]
    TickNotLoaded(i32),

    /// No initialized tick at or below the active tick
    #[error("Tick data pivot not found for active tick {0}")]
    PivotNotFound(i32),

    // ═══════════════════════════════════════════════════════════════════════
    // ROUTING ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// No candidate route connects the two tokens
    #[error("No route found")]
    NoRouteFound,

    /// A hop cannot satisfy the requested amount
    #[error("Insufficient liquidity")]
    InsufficientLiquidity,

    // ═══════════════════════════════════════════════════════════════════════
    // LEDGER ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Account not created on-chain yet
    #[error("Account {0} not found")]
    AccountNotFound(String),

    /// Account bytes do not match the expected layout
    #[error("Invalid account data: {0}")]
    InvalidAccountData(String),

    /// Transport failure reported by the ledger reader
    #[error("Ledger error: {0}")]
    Ledger(String),

    // ═══════════════════════════════════════════════════════════════════════
    // CONFIG ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ClmmError>;
