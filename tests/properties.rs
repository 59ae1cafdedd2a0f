//! Property-based tests for value-type and signature invariants

use ledgerchain::crypto::SignatureEngine;
use ledgerchain::hashing::transaction_id;
use ledgerchain::primitives::{Amount, Hash, WalletAddress};
use ledgerchain::serializer::unassigned_payload;
use proptest::prelude::*;

// ============================================================================
// Value Types
// ============================================================================

proptest! {
    /// Property: Amount accepts exactly the positive values and keeps them unchanged
    #[test]
    fn amount_accepts_only_positive(value in any::<i64>()) {
        match Amount::new(value) {
            Ok(amount) => {
                prop_assert!(value > 0);
                prop_assert_eq!(amount.value(), value);
            }
            Err(_) => prop_assert!(value <= 0),
        }
    }

    /// Property: Hash accepts any 64-char lowercase hex string
    #[test]
    fn hash_accepts_lowercase_hex(value in "[0-9a-f]{64}") {
        let hash = Hash::new(value.clone()).unwrap();
        prop_assert_eq!(hash.as_str(), value.as_str());
    }

    /// Property: Hash rejects wrong lengths
    #[test]
    fn hash_rejects_wrong_length(value in "[0-9a-f]{0,63}|[0-9a-f]{65,80}") {
        prop_assert!(Hash::new(value).is_err());
    }

    /// Property: Hash rejects any uppercase hex digit
    #[test]
    fn hash_rejects_uppercase(prefix in "[0-9a-f]{0,63}", upper in "[A-F]") {
        let mut value = prefix;
        value.push_str(&upper);
        while value.len() < 64 {
            value.push('0');
        }
        prop_assert!(Hash::new(value).is_err());
    }

    /// Property: Hash rejects non-hex characters
    #[test]
    fn hash_rejects_non_hex(prefix in "[0-9a-f]{63}", bad in "[g-zG-Z!@# ]") {
        let value = format!("{}{}", prefix, bad);
        prop_assert!(Hash::new(value).is_err());
    }

    /// Property: WalletAddress length bounds are exclusive on both ends
    #[test]
    fn wallet_address_bounds(len in 0usize..200) {
        let result = WalletAddress::new("x".repeat(len));
        prop_assert_eq!(result.is_ok(), len > 30 && len < 128);
    }
}

// ============================================================================
// Transaction Ids
// ============================================================================

proptest! {
    /// Property: the id is a pure function of the unassigned payload
    #[test]
    fn transaction_id_idempotent(amount in 1i64..1_000_000, suffix in "[a-z]{31,40}") {
        let from = WalletAddress::new(format!("from{}", suffix)).unwrap();
        let to = WalletAddress::new(format!("to{}", suffix)).unwrap();
        let amount = Amount::new(amount).unwrap();

        let first = transaction_id(&unassigned_payload(&from, &to, amount)).unwrap();
        let second = transaction_id(&unassigned_payload(&from, &to, amount)).unwrap();
        prop_assert_eq!(&first, &second);

        let bumped = Amount::new(amount.value() + 1).unwrap();
        let other = transaction_id(&unassigned_payload(&from, &to, bumped)).unwrap();
        prop_assert_ne!(first, other);
    }
}

// ============================================================================
// Signatures
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: verify(payload, sign(payload, sk), pk) holds for every payload
    #[test]
    fn sign_verify_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..512)) {
        let engine = SignatureEngine::new();
        let keypair = engine.generate_key_pair().unwrap();
        let signature = engine.sign(&payload, &keypair.secret_bytes()).unwrap();
        prop_assert!(engine.verify(&payload, &signature, &keypair.public_key_bytes()).unwrap());
    }

    /// Property: any single-bit change to payload or signature breaks verification
    #[test]
    fn single_bit_mutation_fails(
        payload in proptest::collection::vec(any::<u8>(), 1..256),
        payload_bit in any::<prop::sample::Index>(),
        signature_bit in any::<prop::sample::Index>(),
    ) {
        let engine = SignatureEngine::new();
        let keypair = engine.generate_key_pair().unwrap();
        let public_key = keypair.public_key_bytes();
        let signature = engine.sign(&payload, &keypair.secret_bytes()).unwrap();

        let bit = payload_bit.index(payload.len() * 8);
        let mut mutated_payload = payload.clone();
        mutated_payload[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(!engine.verify(&mutated_payload, &signature, &public_key).unwrap());

        let bit = signature_bit.index(signature.len() * 8);
        let mut mutated_signature = signature.clone();
        mutated_signature[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(!engine.verify(&payload, &mutated_signature, &public_key).unwrap());
    }

    /// Property: a signature never verifies under another key pair's public key
    #[test]
    fn other_public_key_fails(payload in proptest::collection::vec(any::<u8>(), 0..256)) {
        let engine = SignatureEngine::new();
        let signer = engine.generate_key_pair().unwrap();
        let other = engine.generate_key_pair().unwrap();
        let signature = engine.sign(&payload, &signer.secret_bytes()).unwrap();
        prop_assert!(!engine.verify(&payload, &signature, &other.public_key_bytes()).unwrap());
    }
}
