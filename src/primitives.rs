//! Value types shared by every ledger component.
//!
//! Each type checks its invariant once, at construction, and is immutable
//! afterwards. Deserialization goes through the same constructors so a value read
//! back from storage can never violate them.

use crate::error::ChainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque participant identifier. Its length must lie strictly between
/// [`WalletAddress::MIN_LENGTH`] and [`WalletAddress::MAX_LENGTH`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub const MIN_LENGTH: usize = 30;
    pub const MAX_LENGTH: usize = 128;

    pub fn new(value: impl Into<String>) -> Result<Self, ChainError> {
        let value = value.into();
        let len = value.chars().count();
        if len <= Self::MIN_LENGTH || len >= Self::MAX_LENGTH {
            return Err(ChainError::InvalidAddress(format!(
                "length must be greater than {} and less than {} characters, got {}",
                Self::MIN_LENGTH,
                Self::MAX_LENGTH,
                len
            )));
        }
        Ok(WalletAddress(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ChainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        WalletAddress::new(value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

/// Strictly positive transfer quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Result<Self, ChainError> {
        if value <= 0 {
            return Err(ChainError::InvalidAmount(format!(
                "amount must be positive, got {}",
                value
            )));
        }
        Ok(Amount(value))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Amount {
    type Error = ChainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// 64 lowercase hexadecimal characters. Used both as a content digest and as the
/// pointer from a block to its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hash(String);

impl Hash {
    pub const HEX_LENGTH: usize = 64;

    pub fn new(value: impl Into<String>) -> Result<Self, ChainError> {
        let value = value.into();
        if !Self::is_valid_hex(&value) {
            return Err(ChainError::InvalidHashFormat(format!(
                "value must be {} hex characters [0-9a-f], got {:?}",
                Self::HEX_LENGTH,
                value
            )));
        }
        Ok(Hash(value))
    }

    /// Hex-encodes a raw 32-byte digest, re-checking the result against the
    /// format invariant before handing it out.
    pub fn from_digest(digest: &[u8; 32]) -> Result<Self, ChainError> {
        Hash::new(hex::encode(digest))
    }

    /// The all-zero hash, used as the predecessor pointer of the genesis block.
    pub fn zero() -> Self {
        Hash("0".repeat(Self::HEX_LENGTH))
    }

    /// Matches `^[0-9a-f]{64}$`.
    pub fn is_valid_hex(value: &str) -> bool {
        value.len() == Self::HEX_LENGTH
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Hash {
    type Error = ChainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Hash::new(value)
    }
}

impl From<Hash> for String {
    fn from(hash: Hash) -> Self {
        hash.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_HASH: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_wallet_address_bounds_are_exclusive() {
        assert!(WalletAddress::new("a".repeat(30)).is_err());
        assert!(WalletAddress::new("a".repeat(31)).is_ok());
        assert!(WalletAddress::new("a".repeat(127)).is_ok());
        assert!(WalletAddress::new("a".repeat(128)).is_err());
        assert!(WalletAddress::new("null").is_err());
    }

    #[test]
    fn test_wallet_address_keeps_value() {
        let address = WalletAddress::new("qwertyuiqwertyuiqwertyuiqwertyui").unwrap();
        assert_eq!(address.as_str(), "qwertyuiqwertyuiqwertyuiqwertyui");
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(matches!(Amount::new(0), Err(ChainError::InvalidAmount(_))));
        assert!(matches!(Amount::new(-5), Err(ChainError::InvalidAmount(_))));
        assert_eq!(Amount::new(10).unwrap().value(), 10);
    }

    #[test]
    fn test_hash_accepts_lowercase_hex() {
        let hash = Hash::new(VALID_HASH).unwrap();
        assert_eq!(hash.as_str(), VALID_HASH);
        assert_eq!(hash, Hash::new(VALID_HASH).unwrap());
        assert!(hash.to_string().contains(VALID_HASH));
    }

    #[test]
    fn test_hash_rejects_bad_input() {
        assert!(Hash::new("abc123").is_err());
        assert!(Hash::new("a".repeat(65)).is_err());
        assert!(Hash::new("ABCDEF".repeat(10) + "ABCD").is_err());
        assert!(Hash::new("z".repeat(64)).is_err());
    }

    #[test]
    fn test_zero_hash_is_valid() {
        assert!(Hash::is_valid_hex(Hash::zero().as_str()));
    }

    #[test]
    fn test_deserialization_enforces_invariants() {
        let bad: Result<Amount, _> = serde_json::from_str("0");
        assert!(bad.is_err());
        let bad: Result<Hash, _> = serde_json::from_str("\"xyz\"");
        assert!(bad.is_err());
        let ok: WalletAddress =
            serde_json::from_str("\"qwertyuiqwertyuiqwertyuiqwertyui\"").unwrap();
        assert_eq!(ok.as_str().len(), 32);
    }
}
