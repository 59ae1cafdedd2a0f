//! Canonical byte encodings of a transaction.
//!
//! Fields are joined with a literal `|` and UTF-8 encoded. The unassigned payload is
//! what gets signed, verified and hashed into a transaction id, so its layout is
//! fixed for the life of a chain: changing it invalidates every signature and id.

use crate::primitives::{Amount, WalletAddress};
use crate::transaction::Transaction;

pub const FIELD_SEPARATOR: char = '|';

/// `from|to|amount`
pub fn unassigned_payload(from: &WalletAddress, to: &WalletAddress, amount: Amount) -> Vec<u8> {
    format!(
        "{}{sep}{}{sep}{}",
        from,
        to,
        amount.value(),
        sep = FIELD_SEPARATOR
    )
    .into_bytes()
}

/// `from|to|amount|hex(signature)|hex(publicKey)`. Only measured for the size
/// limit, never signed.
pub fn serialized_transaction(tx: &Transaction) -> Vec<u8> {
    format!(
        "{}{sep}{}{sep}{}{sep}{}{sep}{}",
        tx.from,
        tx.to,
        tx.amount.value(),
        hex::encode(&tx.signature),
        tx.public_key.to_hex(),
        sep = FIELD_SEPARATOR
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SignatureEngine;

    fn address(c: char) -> WalletAddress {
        WalletAddress::new(c.to_string().repeat(32)).unwrap()
    }

    #[test]
    fn test_unassigned_payload_layout() {
        let payload = unassigned_payload(&address('A'), &address('B'), Amount::new(100).unwrap());
        let expected = format!("{}|{}|100", "A".repeat(32), "B".repeat(32));
        assert_eq!(payload, expected.into_bytes());
    }

    #[test]
    fn test_serialized_transaction_layout() {
        let engine = SignatureEngine::new();
        let keypair = engine.generate_key_pair().unwrap();
        let tx = Transaction::new(
            address('A'),
            address('B'),
            Amount::new(7).unwrap(),
            vec![0xab, 0x01],
            keypair.public_key_bytes(),
        );

        let text = String::from_utf8(serialized_transaction(&tx)).unwrap();
        let parts: Vec<&str> = text.split('|').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[2], "7");
        assert_eq!(parts[3], "ab01");
        assert_eq!(parts[4], keypair.public_key_bytes().to_hex());
    }
}
