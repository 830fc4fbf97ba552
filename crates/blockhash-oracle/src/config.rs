//! Oracle configuration
//!
//! ```toml
//! lookback_window = 256
//! ```

use crate::error::ConfigError;
use serde::Deserialize;

/// Blocks the native lookback covers on the source chain
pub const DEFAULT_LOOKBACK_WINDOW: u64 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OracleConfig {
    /// How many blocks behind the head the native lookback can see
    pub lookback_window: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            lookback_window: DEFAULT_LOOKBACK_WINDOW,
        }
    }
}

impl OracleConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: OracleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}
