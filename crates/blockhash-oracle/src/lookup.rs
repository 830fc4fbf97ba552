//! Native block hash lookback
//!
//! The host chain can only name the hashes of a short run of recent blocks.
//! Anything older, or not yet produced, comes back as [`BlockHash::ZERO`].

use crate::config::OracleConfig;
use crate::types::BlockHash;
use std::collections::HashMap;

/// The host's native lookback primitive
pub trait BlockHashLookup {
    /// Hash of the block at `height`, or `BlockHash::ZERO` when out of range
    fn block_hash(&self, height: u64) -> BlockHash;
}

/// In-memory lookback over a chain whose head is `head`. Answers heights in
/// `[head - window, head - 1]`.
#[derive(Debug, Clone)]
pub struct RecentWindow {
    head: u64,
    window: u64,
    hashes: HashMap<u64, BlockHash>,
}

impl RecentWindow {
    pub fn new(head: u64, window: u64) -> Self {
        Self {
            head,
            window,
            hashes: HashMap::new(),
        }
    }

    pub fn from_config(config: &OracleConfig, head: u64) -> Self {
        Self::new(head, config.lookback_window)
    }

    /// Record the hash of a produced block
    pub fn insert(&mut self, height: u64, hash: BlockHash) {
        self.hashes.insert(height, hash);
    }

    pub fn head(&self) -> u64 {
        self.head
    }

    pub fn set_head(&mut self, head: u64) {
        self.head = head;
    }

    /// Move the head forward, pushing old blocks out of the window. Hashes
    /// that fall out are dropped.
    pub fn advance(&mut self, blocks: u64) {
        self.head = self.head.saturating_add(blocks);
        let oldest = self.oldest_visible();
        self.hashes.retain(|&height, _| height >= oldest);
    }

    /// Number of hashes held, visible or not yet produced
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Oldest height still visible
    pub fn oldest_visible(&self) -> u64 {
        self.head.saturating_sub(self.window)
    }

    fn in_window(&self, height: u64) -> bool {
        height < self.head && self.head - height <= self.window
    }
}

impl BlockHashLookup for RecentWindow {
    fn block_hash(&self, height: u64) -> BlockHash {
        if !self.in_window(height) {
            return BlockHash::ZERO;
        }
        self.hashes.get(&height).copied().unwrap_or(BlockHash::ZERO)
    }
}

impl<L: BlockHashLookup + ?Sized> BlockHashLookup for &L {
    fn block_hash(&self, height: u64) -> BlockHash {
        (**self).block_hash(height)
    }
}
