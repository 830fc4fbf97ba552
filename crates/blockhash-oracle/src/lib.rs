//! Block hash oracle
//!
//! Extends trust in historical block hashes past the native lookback window,
//! one parent per verified TurboPLONK proof.
//!
//! # Example
//!
//! ```ignore
//! use blockhash_oracle::{BlockHashOracle, OracleConfig, RecentWindow};
//! use turbo_plonk_core::Verifier;
//!
//! let config = OracleConfig::from_toml_str(&config_text)?;
//! let lookup = RecentWindow::from_config(&config, head);
//! let mut oracle = BlockHashOracle::new(Verifier::from_key_bytes(&vk_bytes)?, lookup);
//!
//! oracle.prove_parent(&proof_bytes, &public_inputs)?;
//! ```

pub mod config;
pub mod error;
pub mod lookup;
pub mod oracle;
pub mod store;
pub mod types;

pub use config::OracleConfig;
pub use error::{ConfigError, OracleError, Result};
pub use lookup::{BlockHashLookup, RecentWindow};
pub use oracle::{BlockHashOracle, ProofVerifier};
pub use store::{MemoryStore, TrustedStore};
pub use types::{BlockHash, PublicInputs, PUBLIC_INPUT_COUNT};
