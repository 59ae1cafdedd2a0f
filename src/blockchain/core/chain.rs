use crate::error::ChainError;
use crate::hashing;
use crate::primitives::Hash;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// Fixed genesis timestamp (2023-01-01T00:00:00Z, milliseconds).
pub const GENESIS_TIMESTAMP: u64 = 1672531200000;

/// Nonce written into every assembled block. There is no mining, so it never varies.
pub const DEFAULT_NONCE: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
    pub previous_hash: Hash,
    pub nonce: u64,
    pub hash: Hash,
}

impl Block {
    /// Builds a block from already-known parts, trusting `hash` as given.
    pub fn new(
        index: u64,
        timestamp: u64,
        transactions: Vec<Transaction>,
        previous_hash: Hash,
        nonce: u64,
        hash: Hash,
    ) -> Self {
        Block {
            index,
            timestamp,
            transactions,
            previous_hash,
            nonce,
            hash,
        }
    }

    /// Builds a block and computes its hash.
    pub fn assemble(
        index: u64,
        timestamp: u64,
        transactions: Vec<Transaction>,
        previous_hash: Hash,
        nonce: u64,
    ) -> Result<Self, ChainError> {
        let hash = hashing::block_hash(index, timestamp, &previous_hash, nonce, &transactions)?;
        Ok(Block::new(index, timestamp, transactions, previous_hash, nonce, hash))
    }

    /// Candidate that extends `tip`, stamped with the current time.
    pub fn next_after(tip: &Block, transactions: Vec<Transaction>) -> Result<Self, ChainError> {
        let timestamp = chrono::Utc::now().timestamp_millis().max(0) as u64;
        Block::assemble(
            tip.index + 1,
            timestamp,
            transactions,
            tip.hash.clone(),
            DEFAULT_NONCE,
        )
    }

    pub fn genesis() -> Result<Self, ChainError> {
        Block::assemble(0, GENESIS_TIMESTAMP, Vec::new(), Hash::zero(), DEFAULT_NONCE)
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash == Hash::zero()
    }

    /// Recomputes the hash from the block's fields and compares it to the stored one.
    pub fn has_valid_hash(&self) -> Result<bool, ChainError> {
        let expected = hashing::block_hash(
            self.index,
            self.timestamp,
            &self.previous_hash,
            self.nonce,
            &self.transactions,
        )?;
        Ok(expected == self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_is_fixed() {
        let a = Block::genesis().unwrap();
        let b = Block::genesis().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.index, 0);
        assert_eq!(a.previous_hash.as_str(), "0".repeat(64));
        assert!(a.transactions.is_empty());
        assert!(a.is_genesis());
        assert!(a.has_valid_hash().unwrap());
    }

    #[test]
    fn test_next_after_links_to_tip() {
        let genesis = Block::genesis().unwrap();
        let next = Block::next_after(&genesis, Vec::new()).unwrap();
        assert_eq!(next.index, 1);
        assert_eq!(next.previous_hash, genesis.hash);
        assert_eq!(next.nonce, DEFAULT_NONCE);
        assert!(!next.is_genesis());
        assert!(next.has_valid_hash().unwrap());
    }

    #[test]
    fn test_tampered_block_fails_hash_check() {
        let genesis = Block::genesis().unwrap();
        let mut next = Block::next_after(&genesis, Vec::new()).unwrap();
        next.timestamp += 1;
        assert!(!next.has_valid_hash().unwrap());
    }
}
