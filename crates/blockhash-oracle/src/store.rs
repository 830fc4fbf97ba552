//! Trusted block hash storage
//!
//! The store is a plain map. Append-only semantics (no overwrite, no removal)
//! are enforced by the oracle, not here.

use crate::types::BlockHash;
use std::collections::HashMap;

pub trait TrustedStore {
    /// Height at which `hash` was trusted
    fn get(&self, hash: &BlockHash) -> Option<u64>;

    fn insert(&mut self, hash: BlockHash, height: u64);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `HashMap`-backed store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<BlockHash, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockHash, &u64)> {
        self.entries.iter()
    }
}

impl TrustedStore for MemoryStore {
    fn get(&self, hash: &BlockHash) -> Option<u64> {
        self.entries.get(hash).copied()
    }

    fn insert(&mut self, hash: BlockHash, height: u64) {
        self.entries.insert(hash, height);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
