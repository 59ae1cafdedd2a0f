//! Transaction admission pipeline: runs every check and collects error codes
use crate::crypto::SignatureEngine;
use crate::error::ChainError;
use crate::oracle::{AccountOracle, AddressOracle, MempoolOracle, PolicyProvider};
use crate::primitives::Hash;
use crate::transaction::types::Transaction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stable, externally reported reasons a transaction was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidAddressFrom,
    /// Reserved; no check currently produces it.
    InvalidAddressTo,
    ForbiddenAddress,
    AmountNotPositive,
    AmountTooLarge,
    TxTooLarge,
    /// Reserved; no check currently produces it.
    PublicKeyMismatch,
    InvalidSignature,
    DuplicateTransaction,
    InsufficientFunds,
}

impl ErrorCode {
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::InvalidAddressFrom => 1001,
            ErrorCode::InvalidAddressTo => 1002,
            ErrorCode::ForbiddenAddress => 1003,
            ErrorCode::AmountNotPositive => 1004,
            ErrorCode::AmountTooLarge => 1005,
            ErrorCode::TxTooLarge => 1006,
            ErrorCode::PublicKeyMismatch => 1007,
            ErrorCode::InvalidSignature => 1008,
            ErrorCode::DuplicateTransaction => 1009,
            ErrorCode::InsufficientFunds => 1010,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidAddressFrom => "Invalid address format for sender",
            ErrorCode::InvalidAddressTo => "Invalid address format for recipient",
            ErrorCode::ForbiddenAddress => "Recipient address is in the blocklist",
            ErrorCode::AmountNotPositive => "Transaction amount must be positive",
            ErrorCode::AmountTooLarge => "Transaction amount exceeds the limit",
            ErrorCode::TxTooLarge => "Transaction size exceeds the limit",
            ErrorCode::PublicKeyMismatch => "Sender address does not match public key",
            ErrorCode::InvalidSignature => "Invalid transaction signature",
            ErrorCode::DuplicateTransaction => "Transaction already exists in mempool",
            ErrorCode::InsufficientFunds => "Insufficient funds for transaction",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Ok,
    Error,
}

/// Outcome of one validation call. `tx_id` is present iff the status is OK;
/// `errors` is non-empty iff the status is ERROR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub tx_id: Option<Hash>,
    pub errors: Vec<ErrorCode>,
}

impl ValidationResult {
    pub fn ok(tx_id: Hash) -> Self {
        ValidationResult {
            status: ValidationStatus::Ok,
            tx_id: Some(tx_id),
            errors: Vec::new(),
        }
    }

    /// An ERROR result. An empty `errors` list is not a rejection, so callers
    /// must only use this with at least one code.
    pub fn rejected(errors: Vec<ErrorCode>) -> Self {
        debug_assert!(!errors.is_empty());
        ValidationResult {
            status: ValidationStatus::Error,
            tx_id: None,
            errors,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ValidationStatus::Ok
    }
}

/// Read-only decision function over a transaction. Holds its collaborators and
/// never mutates them, so one validator may serve many concurrent callers.
pub struct TransactionValidator {
    addresses: Arc<dyn AddressOracle>,
    policy: Arc<dyn PolicyProvider>,
    accounts: Arc<dyn AccountOracle>,
    mempool: Arc<dyn MempoolOracle>,
    engine: Arc<SignatureEngine>,
}

impl TransactionValidator {
    pub fn new(
        addresses: Arc<dyn AddressOracle>,
        policy: Arc<dyn PolicyProvider>,
        accounts: Arc<dyn AccountOracle>,
        mempool: Arc<dyn MempoolOracle>,
        engine: Arc<SignatureEngine>,
    ) -> Self {
        TransactionValidator {
            addresses,
            policy,
            accounts,
            mempool,
            engine,
        }
    }

    /// Runs all eight checks in a fixed order without short-circuiting. The
    /// returned error list keeps that order. `Err` is reserved for environment
    /// failures from the crypto or hash engines.
    pub fn validate(&self, tx: &Transaction) -> Result<ValidationResult, ChainError> {
        info!(
            "Start of transaction validation: from={}, to={}, amount={}",
            tx.from, tx.to, tx.amount
        );
        let mut errors = Vec::new();

        debug!("Address verification");
        if !self.addresses.derive_and_compare(&tx.from, &tx.public_key) {
            warn!("Invalid sender address {}: does not match the public key", tx.from);
            errors.push(ErrorCode::InvalidAddressFrom);
        }

        if self.policy.is_blocked(&tx.to) {
            warn!("Recipient address {} is in the prohibited list", tx.to);
            errors.push(ErrorCode::ForbiddenAddress);
        }

        debug!("Validation of the transaction amount");
        // Unreachable while Amount::new rejects non-positive values.
        if tx.amount.value() <= 0 {
            warn!("Transaction amount is not positive: {}", tx.amount);
            errors.push(ErrorCode::AmountNotPositive);
        }

        let max_amount = self.policy.max_amount();
        if tx.amount > max_amount {
            warn!(
                "Transaction amount {} exceeds the maximum limit {}",
                tx.amount, max_amount
            );
            errors.push(ErrorCode::AmountTooLarge);
        }

        debug!("Checking the transaction size");
        let size = tx.serialized().len();
        let max_size = self.policy.max_tx_size();
        if size > max_size {
            warn!(
                "Transaction size {} bytes exceeds the maximum limit {} bytes",
                size, max_size
            );
            errors.push(ErrorCode::TxTooLarge);
        }

        debug!("Digital signature verification");
        let payload = tx.unassigned_payload();
        if !self.engine.verify(&payload, &tx.signature, &tx.public_key)? {
            warn!("The digital signature of the transaction is incorrect");
            errors.push(ErrorCode::InvalidSignature);
        }

        debug!("Checking sender's balance");
        let balance = self.accounts.balance(&tx.from);
        let pending = self.accounts.pending(&tx.from);
        let available = balance as i128 - pending as i128;
        if available < tx.amount.value() as i128 {
            warn!(
                "Sender {} does not have enough funds. Available: {}, required: {}",
                tx.from, available, tx.amount
            );
            errors.push(ErrorCode::InsufficientFunds);
        }

        debug!("Checking for duplicates in the mempool");
        let tx_id = crate::hashing::transaction_id(&payload)?;
        if self.mempool.contains(&tx_id) {
            warn!("Duplicate transaction detected with TxId: {}", tx_id);
            errors.push(ErrorCode::DuplicateTransaction);
        }

        if errors.is_empty() {
            info!("Transaction passed all checks. TxId: {}", tx_id);
            Ok(ValidationResult::ok(tx_id))
        } else {
            warn!("Transaction was not validated. Errors found: {:?}", errors);
            Ok(ValidationResult::rejected(errors))
        }
    }
}
