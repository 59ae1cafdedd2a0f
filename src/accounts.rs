//! Balance lookups for the admission pipeline.

use crate::mempool::Mempool;
use crate::oracle::AccountOracle;
use crate::primitives::WalletAddress;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Confirmed balances with a configurable fallback for unknown addresses.
/// Pending amounts are read from the mempool.
pub struct AccountState {
    balances: RwLock<HashMap<WalletAddress, u64>>,
    default_balance: u64,
    mempool: Arc<Mempool>,
}

impl AccountState {
    pub fn new(default_balance: u64, mempool: Arc<Mempool>) -> Self {
        AccountState {
            balances: RwLock::new(HashMap::new()),
            default_balance,
            mempool,
        }
    }

    pub fn set_balance(&self, address: WalletAddress, balance: u64) {
        self.balances.write().insert(address, balance);
    }

    pub fn credit(&self, address: WalletAddress, amount: u64) {
        let mut balances = self.balances.write();
        let entry = balances.entry(address).or_insert(self.default_balance);
        *entry = entry.saturating_add(amount);
    }
}

impl AccountOracle for AccountState {
    fn balance(&self, address: &WalletAddress) -> u64 {
        self.balances
            .read()
            .get(address)
            .copied()
            .unwrap_or(self.default_balance)
    }

    fn pending(&self, address: &WalletAddress) -> u64 {
        self.mempool.pending_amount(address)
    }
}
