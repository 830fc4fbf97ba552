//! Error types for the block hash oracle

use crate::types::BlockHash;
use thiserror::Error;
use turbo_plonk_core::VerifyError;

/// Errors from anchoring and proving
#[derive(Error, Debug)]
pub enum OracleError {
    /// The native lookback returned nothing for this height
    #[error("Block {height} is outside the native lookback window")]
    WindowExceeded { height: u64 },

    /// The proven block is neither trusted nor coverable by the native window
    #[error("Block hash {0} is not trusted and cannot be anchored")]
    Unvalidated(BlockHash),

    /// The proof did not satisfy the pairing check
    #[error("Invalid proof")]
    InvalidProof,

    /// Malformed proof, key or inputs caught before the pairing
    #[error("Verifier error: {0}")]
    Verifier(VerifyError),

    #[error("Public input error: {0}")]
    PublicInput(String),
}

impl From<VerifyError> for OracleError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::VerificationFailed => OracleError::InvalidProof,
            other => OracleError::Verifier(other),
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("lookback_window must be at least 1")]
    ZeroWindow,
}

pub type Result<T> = std::result::Result<T, OracleError>;
