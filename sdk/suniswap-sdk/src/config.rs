//! Engine configuration
//!
//! The fee tier table is compiled in and intentionally not part of this.

use std::env;
use std::str::FromStr;

use anchor_lang::prelude::Pubkey;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_MAX_HOPS, DEFAULT_TICK_WINDOW_WORDS};
use crate::errors::{ClmmError, Result};
use crate::state::token::Token;

pub const ENV_PROGRAM_ID: &str = "SUNISWAP_PROGRAM_ID";
pub const ENV_TICK_WINDOW_WORDS: &str = "SUNISWAP_TICK_WINDOW_WORDS";
pub const ENV_MAX_HOPS: &str = "SUNISWAP_MAX_HOPS";

/// Upper bound on the tick cache window, in bitmap words per side
const MAX_TICK_WINDOW_WORDS: u16 = 64;
/// Upper bound on route length
const MAX_ROUTE_HOPS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Program that owns pools, ticks and bitmap words
    #[serde(with = "crate::utils::pubkey_string")]
    pub program_id: Pubkey,
    /// Bitmap words loaded on each side of the active word
    pub tick_window_words: u16,
    /// Maximum pools per route
    pub max_hops: usize,
    /// Intermediate tokens considered when building candidate pairs
    pub base_tokens: Vec<Token>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program_id: crate::ID,
            tick_window_words: DEFAULT_TICK_WINDOW_WORDS,
            max_hops: DEFAULT_MAX_HOPS,
            base_tokens: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any SUNISWAP_* variables that are set
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = env::var(ENV_PROGRAM_ID) {
            config.program_id = Pubkey::from_str(raw.trim())
                .map_err(|e| ClmmError::Config(format!("{ENV_PROGRAM_ID}: {e}")))?;
        }
        if let Ok(raw) = env::var(ENV_TICK_WINDOW_WORDS) {
            config.tick_window_words = raw
                .trim()
                .parse()
                .map_err(|e| ClmmError::Config(format!("{ENV_TICK_WINDOW_WORDS}: {e}")))?;
        }
        if let Ok(raw) = env::var(ENV_MAX_HOPS) {
            config.max_hops = raw
                .trim()
                .parse()
                .map_err(|e| ClmmError::Config(format!("{ENV_MAX_HOPS}: {e}")))?;
        }

        config.validate()?;
        debug!(
            program_id = %config.program_id,
            tick_window_words = config.tick_window_words,
            max_hops = config.max_hops,
            "loaded engine config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_window_words > MAX_TICK_WINDOW_WORDS {
            return Err(ClmmError::Config(format!(
                "tick_window_words must be at most {MAX_TICK_WINDOW_WORDS}, got {}",
                self.tick_window_words
            )));
        }
        if self.max_hops == 0 || self.max_hops > MAX_ROUTE_HOPS {
            return Err(ClmmError::Config(format!(
                "max_hops must be between 1 and {MAX_ROUTE_HOPS}, got {}",
                self.max_hops
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_hops, 2);
        assert_eq!(config.program_id, crate::ID);
    }

    #[test]
    fn test_validate_bounds() {
        let config = EngineConfig {
            max_hops: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ClmmError::Config(_))));

        let config = EngineConfig {
            tick_window_words: 1000,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ClmmError::Config(_))));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: EngineConfig = serde_json::from_str(r#"{ "max_hops": 3 }"#).unwrap();
        assert_eq!(config.max_hops, 3);
        assert_eq!(config.tick_window_words, DEFAULT_TICK_WINDOW_WORDS);
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = EngineConfig {
            base_tokens: vec![Token::new(0, Pubkey::new_from_array([4; 32]), 9, "SOL")],
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(&crate::ID.to_string()));
        let decoded: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_from_env() {
        // Only this test touches the SUNISWAP_* variables
        env::set_var(ENV_MAX_HOPS, "3");
        env::set_var(ENV_TICK_WINDOW_WORDS, "4");
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.max_hops, 3);
        assert_eq!(config.tick_window_words, 4);

        env::set_var(ENV_MAX_HOPS, "many");
        assert!(matches!(EngineConfig::from_env(), Err(ClmmError::Config(_))));

        env::remove_var(ENV_MAX_HOPS);
        env::remove_var(ENV_TICK_WINDOW_WORDS);
    }
}
