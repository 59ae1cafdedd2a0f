use super::chain::Block;
use super::guard::{check_extends, AppendOutcome};
use crate::error::ChainError;
use crate::persistence::{ChainStore, InMemoryStore};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Append-only chain over a `ChainStore`.
///
/// Every tip read that leads to an append happens under `write_lock`, so two
/// callers racing on the same tip cannot both extend it.
pub struct Ledger {
    store: Box<dyn ChainStore>,
    write_lock: Mutex<()>,
}

impl Ledger {
    pub fn new(store: Box<dyn ChainStore>) -> Self {
        Ledger {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// A ledger over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Box::new(InMemoryStore::new()))
    }

    /// Appends the genesis block. Fails if the store already holds any block.
    pub fn bootstrap_genesis(&self) -> Result<Block, ChainError> {
        let _guard = self.write_lock.lock();
        if self.store.tip()?.is_some() {
            return Err(ChainError::GenesisAlreadyExists);
        }
        let genesis = Block::genesis()?;
        self.store.append(&genesis)?;
        info!("Bootstrapped genesis block {}", genesis.hash);
        Ok(genesis)
    }

    /// Returns the tip, bootstrapping genesis first if the store is empty.
    pub fn ensure_genesis(&self) -> Result<Block, ChainError> {
        match self.tip()? {
            Some(tip) => Ok(tip),
            None => match self.bootstrap_genesis() {
                Err(ChainError::GenesisAlreadyExists) => self.tip()?.ok_or(ChainError::EmptyChain),
                other => other,
            },
        }
    }

    /// Reads the tip, runs the admission guard and appends on acceptance, all
    /// inside one critical section. A rejected candidate never reaches the store.
    pub fn try_append(&self, candidate: Block) -> Result<AppendOutcome, ChainError> {
        let _guard = self.write_lock.lock();
        let tip = self.store.tip()?.ok_or(ChainError::EmptyChain)?;

        let outcome = check_extends(&tip, &candidate);
        if outcome.is_accepted() {
            self.store.append(&candidate)?;
            info!(
                "Block {} appended with {} transaction(s), hash {}",
                candidate.index,
                candidate.transactions.len(),
                candidate.hash
            );
        } else {
            debug!("Candidate block {} discarded: {:?}", candidate.index, outcome);
        }
        Ok(outcome)
    }

    pub fn tip(&self) -> Result<Option<Block>, ChainError> {
        self.store.tip()
    }

    pub fn blocks(&self) -> Result<Vec<Block>, ChainError> {
        self.store.blocks()
    }

    /// Index of the tip, or `None` before genesis.
    pub fn height(&self) -> Result<Option<u64>, ChainError> {
        Ok(self.store.tip()?.map(|b| b.index))
    }

    /// Walks the whole chain and fails on the first block whose stored hash,
    /// index or linkage is wrong.
    pub fn verify_chain(&self) -> Result<(), ChainError> {
        let blocks = self.store.blocks()?;
        let mut previous: Option<&Block> = None;

        for block in &blocks {
            if !block.has_valid_hash()? {
                warn!("Block {} has a hash that does not match its contents", block.index);
                return Err(ChainError::InvalidBlock(format!(
                    "Block {} hash mismatch: stored {}",
                    block.index, block.hash
                )));
            }
            match previous {
                None => {
                    if !block.is_genesis() {
                        return Err(ChainError::InvalidBlock(format!(
                            "First block must be genesis, found index {} with previous hash {}",
                            block.index, block.previous_hash
                        )));
                    }
                }
                Some(prev) => {
                    let outcome = check_extends(prev, block);
                    if !outcome.is_accepted() {
                        return Err(ChainError::InvalidBlock(format!(
                            "Block {} does not extend block {}: {:?}",
                            block.index, prev.index, outcome
                        )));
                    }
                }
            }
            previous = Some(block);
        }

        debug!("Verified {} block(s)", blocks.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Hash;

    #[test]
    fn test_try_append_on_empty_chain_errors() {
        let ledger = Ledger::in_memory();
        let genesis = Block::genesis().unwrap();
        let candidate = Block::next_after(&genesis, Vec::new()).unwrap();
        assert_eq!(ledger.try_append(candidate), Err(ChainError::EmptyChain));
    }

    #[test]
    fn test_bootstrap_only_once() {
        let ledger = Ledger::in_memory();
        let genesis = ledger.bootstrap_genesis().unwrap();
        assert_eq!(ledger.height().unwrap(), Some(0));
        assert_eq!(ledger.tip().unwrap(), Some(genesis.clone()));
        assert_eq!(ledger.bootstrap_genesis(), Err(ChainError::GenesisAlreadyExists));
        assert_eq!(ledger.ensure_genesis().unwrap(), genesis);
    }

    #[test]
    fn test_append_extends_tip() {
        let ledger = Ledger::in_memory();
        let genesis = ledger.bootstrap_genesis().unwrap();

        let first = Block::next_after(&genesis, Vec::new()).unwrap();
        assert_eq!(ledger.try_append(first.clone()).unwrap(), AppendOutcome::Accepted);

        // Same parent again: index no longer follows the tip and the link is stale.
        let stale = Block::next_after(&genesis, Vec::new()).unwrap();
        assert_eq!(
            ledger.try_append(stale).unwrap(),
            AppendOutcome::RejectedLinkMismatch
        );

        assert_eq!(ledger.blocks().unwrap().len(), 2);
        assert_eq!(ledger.tip().unwrap(), Some(first));
        ledger.verify_chain().unwrap();
    }

    #[test]
    fn test_verify_chain_detects_tampering() {
        let store = InMemoryStore::new();
        let genesis = Block::genesis().unwrap();
        store.append(&genesis).unwrap();
        let mut forged = Block::next_after(&genesis, Vec::new()).unwrap();
        forged.hash = Hash::new("f".repeat(64)).unwrap();
        store.append(&forged).unwrap();

        let ledger = Ledger::new(Box::new(store));
        assert!(matches!(ledger.verify_chain(), Err(ChainError::InvalidBlock(_))));
    }

    #[test]
    fn test_verify_chain_detects_altered_transactions() {
        use crate::crypto::SignatureEngine;
        use crate::primitives::{Amount, WalletAddress};
        use crate::transaction::Transaction;

        let engine = SignatureEngine::new();
        let keypair = engine.generate_key_pair().unwrap();
        let tx = Transaction::create(
            &engine,
            WalletAddress::new("A".repeat(32)).unwrap(),
            WalletAddress::new("B".repeat(32)).unwrap(),
            Amount::new(10).unwrap(),
            &keypair,
        )
        .unwrap();

        let store = InMemoryStore::new();
        let genesis = Block::genesis().unwrap();
        store.append(&genesis).unwrap();
        let mut altered = Block::next_after(&genesis, vec![tx]).unwrap();
        altered.transactions[0].amount = Amount::new(10_000).unwrap();
        store.append(&altered).unwrap();

        let ledger = Ledger::new(Box::new(store));
        assert!(matches!(ledger.verify_chain(), Err(ChainError::InvalidBlock(_))));
    }
}
