//! SHA-256 digests for transaction ids and block hashes.

use crate::error::ChainError;
use crate::primitives::Hash;
use crate::serializer;
use crate::transaction::Transaction;
use sha2::{Digest, Sha256};

/// Transaction id: SHA-256 over the unassigned payload.
pub fn transaction_id(unassigned_payload: &[u8]) -> Result<Hash, ChainError> {
    let digest: [u8; 32] = Sha256::digest(unassigned_payload).into();
    Hash::from_digest(&digest)
}

/// Block hash over a fixed little-endian encoding of the header fields followed
/// by every transaction's full canonical payload, each length-prefixed.
pub fn block_hash(
    index: u64,
    timestamp: u64,
    previous_hash: &Hash,
    nonce: u64,
    transactions: &[Transaction],
) -> Result<Hash, ChainError> {
    let mut hasher = Sha256::new();
    hasher.update(index.to_le_bytes());
    hasher.update(timestamp.to_le_bytes());
    hasher.update(previous_hash.as_str().as_bytes());
    hasher.update(nonce.to_le_bytes());
    hasher.update((transactions.len() as u64).to_le_bytes());
    for tx in transactions {
        let payload = serializer::serialized_transaction(tx);
        hasher.update((payload.len() as u64).to_le_bytes());
        hasher.update(&payload);
    }
    let digest: [u8; 32] = hasher.finalize().into();
    Hash::from_digest(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_is_deterministic() {
        let a = transaction_id(b"from|to|100").unwrap();
        let b = transaction_id(b"from|to|100").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, transaction_id(b"from|to|101").unwrap());
    }

    #[test]
    fn test_transaction_id_known_vector() {
        // SHA-256("abc")
        let id = transaction_id(b"abc").unwrap();
        assert_eq!(
            id.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_block_hash_covers_every_header_field() {
        let prev = Hash::zero();
        let base = block_hash(1, 1000, &prev, 1, &[]).unwrap();
        assert_eq!(base, block_hash(1, 1000, &prev, 1, &[]).unwrap());
        assert_ne!(base, block_hash(2, 1000, &prev, 1, &[]).unwrap());
        assert_ne!(base, block_hash(1, 1001, &prev, 1, &[]).unwrap());
        assert_ne!(base, block_hash(1, 1000, &prev, 2, &[]).unwrap());
        let other_prev = transaction_id(b"x").unwrap();
        assert_ne!(base, block_hash(1, 1000, &other_prev, 1, &[]).unwrap());
    }

    #[test]
    fn test_block_hash_covers_transactions() {
        use crate::crypto::SignatureEngine;
        use crate::primitives::{Amount, WalletAddress};

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
        let prev = Hash::zero();

        let with_tx = block_hash(1, 1000, &prev, 1, std::slice::from_ref(&tx)).unwrap();
        assert_ne!(with_tx, block_hash(1, 1000, &prev, 1, &[]).unwrap());

        let mut altered = tx.clone();
        altered.amount = Amount::new(11).unwrap();
        assert_ne!(with_tx, block_hash(1, 1000, &prev, 1, &[altered]).unwrap());

        let mut resigned = tx;
        resigned.signature[0] ^= 0x01;
        assert_ne!(with_tx, block_hash(1, 1000, &prev, 1, &[resigned]).unwrap());
    }
}
