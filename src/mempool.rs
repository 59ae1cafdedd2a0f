//! Pending transaction pool
//!
//! Keyed by transaction id. `admit` performs the duplicate check and the insert
//! under one write lock, so two concurrent submissions of the same transaction
//! cannot both be admitted.

use crate::error::ChainError;
use crate::oracle::MempoolOracle;
use crate::primitives::{Hash, WalletAddress};
use crate::transaction::Transaction;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_MAX_SIZE: usize = 10_000;

pub struct Mempool {
    inner: RwLock<HashMap<Hash, Transaction>>,
    max_size: usize,
}

impl Default for Mempool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl Mempool {
    pub fn new(max_size: usize) -> Self {
        Mempool {
            inner: RwLock::new(HashMap::new()),
            max_size,
        }
    }

    /// Inserts `tx` unless `tx_id` is already pooled. Returns `Ok(false)` when it
    /// was already present.
    pub fn admit(&self, tx_id: Hash, tx: Transaction) -> Result<bool, ChainError> {
        let mut pool = self.inner.write();
        if pool.contains_key(&tx_id) {
            return Ok(false);
        }
        if pool.len() >= self.max_size {
            return Err(ChainError::MempoolFull);
        }
        debug!("Admitting transaction {} to mempool", tx_id);
        pool.insert(tx_id, tx);
        Ok(true)
    }

    pub fn remove(&self, tx_id: &Hash) -> Option<Transaction> {
        self.inner.write().remove(tx_id)
    }

    pub fn get(&self, tx_id: &Hash) -> Option<Transaction> {
        self.inner.read().get(tx_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total amount `address` is sending in pooled transactions.
    pub fn pending_amount(&self, address: &WalletAddress) -> u64 {
        self.inner
            .read()
            .values()
            .filter(|tx| &tx.from == address)
            .map(|tx| tx.amount.value() as u64)
            .fold(0u64, u64::saturating_add)
    }
}

impl MempoolOracle for Mempool {
    fn contains(&self, tx_id: &Hash) -> bool {
        self.inner.read().contains_key(tx_id)
    }
}
