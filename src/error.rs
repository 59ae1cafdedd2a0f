//! Error types for LedgerChain
//!
//! Admission decisions are never reported through this type: a rejected
//! transaction is a [`crate::transaction::ValidationResult`] and a rejected block
//! is a [`crate::blockchain::AppendOutcome`]. `ChainError` covers constructor
//! invariants and environment failures (crypto, storage, configuration).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),
    #[error("Signing failed: {0}")]
    Signing(String),
    #[error("Signature verification failed: {0}")]
    Verification(String),
    #[error("Invalid hash format: {0}")]
    InvalidHashFormat(String),
    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Invalid block: {0}")]
    InvalidBlock(String),
    #[error("Chain is empty; a genesis block must be bootstrapped first")]
    EmptyChain,
    #[error("Genesis block can only be applied to an empty chain")]
    GenesisAlreadyExists,
    #[error("Mempool is full")]
    MempoolFull,
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::SerializationError(err.to_string())
    }
}

impl From<rusqlite::Error> for ChainError {
    fn from(err: rusqlite::Error) -> Self {
        ChainError::DatabaseError(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ChainError::Signing("bad key".to_string()).to_string(),
            "Signing failed: bad key"
        );
        assert_eq!(
            ChainError::EmptyChain.to_string(),
            "Chain is empty; a genesis block must be bootstrapped first"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ChainError = io.into();
        assert!(matches!(err, ChainError::IoError(msg) if msg.contains("missing")));
    }
}
