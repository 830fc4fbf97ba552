//! Chain-of-custody oracle
//!
//! A block hash becomes trusted either because the native lookback can see it
//! ([`BlockHashOracle::anchor_by_window`]) or because a verified proof names
//! it as the parent of an already trusted block
//! ([`BlockHashOracle::prove_parent`]). Entries are never removed or
//! overwritten, so trust only ever grows backward from the newest anchor.

use crate::error::{OracleError, Result};
use crate::lookup::BlockHashLookup;
use crate::store::{MemoryStore, TrustedStore};
use crate::types::{BlockHash, PublicInputs};
use log::{debug, info, warn};
use turbo_plonk_core::{CurveOps, Fr, Verifier, VerifyError};

/// Checks a serialized proof against its public inputs
pub trait ProofVerifier {
    fn verify(&self, proof: &[u8], public_inputs: &[Fr]) -> std::result::Result<(), VerifyError>;
}

impl<C: CurveOps> ProofVerifier for Verifier<C> {
    fn verify(&self, proof: &[u8], public_inputs: &[Fr]) -> std::result::Result<(), VerifyError> {
        Verifier::<C>::verify(self, proof, public_inputs)
    }
}

impl<V: ProofVerifier + ?Sized> ProofVerifier for &V {
    fn verify(&self, proof: &[u8], public_inputs: &[Fr]) -> std::result::Result<(), VerifyError> {
        (**self).verify(proof, public_inputs)
    }
}

pub struct BlockHashOracle<V, L, S = MemoryStore> {
    verifier: V,
    lookup: L,
    store: S,
}

impl<V: ProofVerifier, L: BlockHashLookup> BlockHashOracle<V, L, MemoryStore> {
    pub fn new(verifier: V, lookup: L) -> Self {
        Self::with_store(verifier, lookup, MemoryStore::new())
    }
}

impl<V: ProofVerifier, L: BlockHashLookup, S: TrustedStore> BlockHashOracle<V, L, S> {
    pub fn with_store(verifier: V, lookup: L, store: S) -> Self {
        Self {
            verifier,
            lookup,
            store,
        }
    }

    /// Trust the block at `height` on the word of the native lookback
    pub fn anchor_by_window(&mut self, height: u64) -> Result<BlockHash> {
        let hash = self.lookup.block_hash(height);
        if hash.is_zero() {
            warn!(
                "Anchor rejected: block {} is outside the lookback window",
                height
            );
            return Err(OracleError::WindowExceeded { height });
        }
        self.record(hash, height);
        Ok(hash)
    }

    /// Verify `proof` and trust the parent hash it attests to.
    ///
    /// If the proven block is not yet trusted, the native lookback must
    /// return exactly its hash at the proven height. Nothing is written
    /// unless the proof verifies.
    pub fn prove_parent(&mut self, proof: &[u8], public_inputs: &[Fr]) -> Result<bool> {
        let inputs = PublicInputs::decode(public_inputs)?;
        let parent_height = inputs.height.checked_sub(1).ok_or_else(|| {
            OracleError::PublicInput("Block at height 0 has no parent".to_string())
        })?;

        let pending_anchor = match self.store.get(&inputs.block_hash) {
            Some(trusted_at) => {
                if trusted_at != inputs.height {
                    warn!(
                        "Block {} trusted at height {} but proof claims {}",
                        inputs.block_hash, trusted_at, inputs.height
                    );
                }
                None
            }
            None => {
                let native = self.lookup.block_hash(inputs.height);
                if native.is_zero() || native != inputs.block_hash {
                    warn!(
                        "Proof rejected: {} at height {} is neither trusted nor in the lookback window",
                        inputs.block_hash, inputs.height
                    );
                    return Err(OracleError::Unvalidated(inputs.block_hash));
                }
                Some(native)
            }
        };

        if let Err(err) = self.verifier.verify(proof, public_inputs) {
            warn!(
                "Proof for parent of {} rejected: {}",
                inputs.block_hash, err
            );
            return Err(err.into());
        }

        if let Some(anchor) = pending_anchor {
            self.record(anchor, inputs.height);
        }
        self.record(inputs.parent_hash, parent_height);
        Ok(true)
    }

    /// Height of a trusted block, 0 when untrusted
    pub fn is_trusted(&self, hash: &BlockHash) -> u64 {
        self.store.get(hash).unwrap_or(0)
    }

    /// Like [`Self::is_trusted`], but distinguishes genesis from untrusted
    pub fn trusted_height(&self, hash: &BlockHash) -> Option<u64> {
        self.store.get(hash)
    }

    pub fn trusted_count(&self) -> usize {
        self.store.len()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn lookup_mut(&mut self) -> &mut L {
        &mut self.lookup
    }

    fn record(&mut self, hash: BlockHash, height: u64) {
        match self.store.get(&hash) {
            Some(existing) => {
                debug!("{} already trusted at height {}", hash, existing);
            }
            None => {
                self.store.insert(hash, height);
                info!("Trusted {} at height {}", hash, height);
            }
        }
    }
}
