use crate::accounts::AccountState;
use crate::blockchain::{AppendOutcome, Block, Ledger};
use crate::config::Config;
use crate::crypto::{KeyPair, Sha256AddressDeriver, SignatureEngine};
use crate::error::ChainError;
use crate::mempool::Mempool;
use crate::persistence::{ChainStore, Database, InMemoryStore};
use crate::policy::ValidationPolicy;
use crate::primitives::{Amount, Hash, WalletAddress};
use crate::transaction::{ErrorCode, Transaction, TransactionValidator, ValidationResult};
use std::sync::Arc;
use tracing::{error, info, warn};

/// What happened to a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The admission pipeline refused it, or an identical transaction won the
    /// race into the mempool.
    Rejected(ValidationResult),
    /// Validated and sealed into `block`.
    Appended {
        result: ValidationResult,
        block: Block,
    },
    /// Validated, but the candidate block lost to a concurrent append.
    NotAppended {
        result: ValidationResult,
        outcome: AppendOutcome,
    },
}

impl Submission {
    pub fn validation(&self) -> &ValidationResult {
        match self {
            Submission::Rejected(result) => result,
            Submission::Appended { result, .. } => result,
            Submission::NotAppended { result, .. } => result,
        }
    }
}

/// Composition root. Owns every collaborator the pipeline and the ledger need,
/// including the one `SignatureEngine` shared by all signing and verification.
pub struct Node {
    pub config: Config,
    pub engine: Arc<SignatureEngine>,
    pub mempool: Arc<Mempool>,
    pub accounts: Arc<AccountState>,
    pub policy: Arc<ValidationPolicy>,
    pub validator: TransactionValidator,
    pub ledger: Ledger,
}

/// Installs the global fmt subscriber at `level`. Calling it twice is harmless.
pub fn init_tracing(level: &str) -> Result<(), ChainError> {
    let level: tracing::Level = level
        .parse()
        .map_err(|_| ChainError::ConfigError(format!("Unknown log level {:?}", level)))?;
    let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
    Ok(())
}

impl Node {
    /// Opens the configured chain store and wires the node over it. Only the
    /// `:memory:` path selects the ephemeral store; a database that cannot be
    /// opened is a `DatabaseError`.
    pub fn init(config: Config) -> Result<Self, ChainError> {
        config.validate()?;

        let store: Box<dyn ChainStore> = if config.uses_in_memory_database() {
            warn!("Using the in-memory chain store; blocks will not survive a restart");
            Box::new(InMemoryStore::new())
        } else {
            let db = Database::open(&config.database.path).map_err(|e| {
                error!("Failed to open DB at {}: {}", config.database.path, e);
                e
            })?;
            Box::new(db)
        };

        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Box<dyn ChainStore>) -> Result<Self, ChainError> {
        let engine = Arc::new(SignatureEngine::new());
        let mempool = Arc::new(Mempool::new(config.mempool.max_size));
        let accounts = Arc::new(AccountState::new(
            config.accounts.default_balance,
            mempool.clone(),
        ));
        let policy = Arc::new(ValidationPolicy::from_config(&config.policy)?);

        let validator = TransactionValidator::new(
            Arc::new(Sha256AddressDeriver),
            policy.clone(),
            accounts.clone(),
            mempool.clone(),
            engine.clone(),
        );

        let ledger = Ledger::new(store);
        let tip = ledger.ensure_genesis()?;
        info!("Ledger node ready: chain height = {}", tip.index);

        Ok(Node {
            config,
            engine,
            mempool,
            accounts,
            policy,
            validator,
            ledger,
        })
    }

    pub fn generate_key_pair(&self) -> Result<KeyPair, ChainError> {
        self.engine.generate_key_pair()
    }

    /// Signs a transfer from the address derived from `keypair`.
    pub fn create_transaction(
        &self,
        keypair: &KeyPair,
        to: WalletAddress,
        amount: Amount,
    ) -> Result<Transaction, ChainError> {
        let from = keypair.address()?;
        Transaction::create(&self.engine, from, to, amount, keypair)
    }

    /// Validates `tx`, pools it, seals it into the next block and tries to
    /// append that block. The mempool entry is dropped once the append attempt
    /// finishes, whatever its outcome.
    pub fn submit_transaction(&self, tx: Transaction) -> Result<Submission, ChainError> {
        let result = self.validator.validate(&tx)?;
        let tx_id = match (&result.tx_id, result.is_ok()) {
            (Some(id), true) => id.clone(),
            _ => return Ok(Submission::Rejected(result)),
        };

        if !self.mempool.admit(tx_id.clone(), tx.clone())? {
            warn!("Transaction {} was pooled concurrently; reporting duplicate", tx_id);
            return Ok(Submission::Rejected(ValidationResult::rejected(vec![
                ErrorCode::DuplicateTransaction,
            ])));
        }

        let appended = self.seal(&tx_id, tx);
        self.mempool.remove(&tx_id);

        let (outcome, block) = appended?;
        if outcome.is_accepted() {
            Ok(Submission::Appended { result, block })
        } else {
            warn!("Transaction {} validated but its block was not appended: {:?}", tx_id, outcome);
            Ok(Submission::NotAppended { result, outcome })
        }
    }

    fn seal(&self, tx_id: &Hash, tx: Transaction) -> Result<(AppendOutcome, Block), ChainError> {
        let tip = self.ledger.tip()?.ok_or(ChainError::EmptyChain)?;
        let candidate = Block::next_after(&tip, vec![tx])?;
        info!("Sealing transaction {} into block {}", tx_id, candidate.index);
        let outcome = self.ledger.try_append(candidate.clone())?;
        Ok((outcome, candidate))
    }
}
