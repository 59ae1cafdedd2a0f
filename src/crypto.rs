//! Cryptographic primitives for LedgerChain (secp256k1, ECDSA over SHA-256)

use crate::error::ChainError;
use crate::oracle::AddressOracle;
use crate::primitives::WalletAddress;
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{
    constants::{COMPACT_SIGNATURE_SIZE, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE},
    ecdsa::Signature,
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Compressed secp256k1 public key, checked to be a valid curve point when built.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKeyBytes([u8; PUBLIC_KEY_SIZE]);

impl PublicKeyBytes {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ChainError> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(ChainError::InvalidPublicKey(format!(
                "Public key must be exactly {} bytes (compressed), got {}",
                PUBLIC_KEY_SIZE,
                bytes.len()
            )));
        }
        let key = PublicKey::from_slice(bytes)
            .map_err(|e| ChainError::InvalidPublicKey(e.to_string()))?;
        Ok(PublicKeyBytes(key.serialize()))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, ChainError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| ChainError::InvalidPublicKey(format!("Invalid hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Canonical string form, used wherever the key is rendered into a payload.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicKeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PublicKeyBytes({})", self.to_hex())
    }
}

impl fmt::Display for PublicKeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for PublicKeyBytes {
    type Error = ChainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PublicKeyBytes::from_hex(&value)
    }
}

impl From<PublicKeyBytes> for String {
    fn from(key: PublicKeyBytes) -> Self {
        key.to_hex()
    }
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    pub fn public_key_bytes(&self) -> PublicKeyBytes {
        PublicKeyBytes(self.public_key.serialize())
    }

    pub fn secret_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        self.secret_key.secret_bytes()
    }

    /// The wallet address this key pair controls.
    pub fn address(&self) -> Result<WalletAddress, ChainError> {
        derive_address(&self.public_key_bytes())
    }
}

/// Owns the secp256k1 context. Built once by the composition root and shared;
/// nothing in the crate registers a provider implicitly.
pub struct SignatureEngine {
    secp: Secp256k1<All>,
}

impl Default for SignatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureEngine {
    pub fn new() -> Self {
        SignatureEngine {
            secp: Secp256k1::new(),
        }
    }

    /// Generates a new random key pair from the OS random number generator.
    pub fn generate_key_pair(&self) -> Result<KeyPair, ChainError> {
        let mut seed = [0u8; SECRET_KEY_SIZE];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| ChainError::KeyGeneration(format!("OS randomness unavailable: {}", e)))?;
        let secret_key = SecretKey::from_slice(&seed)
            .map_err(|e| ChainError::KeyGeneration(format!("Invalid secret key: {}", e)))?;
        Ok(self.key_pair_from_secret(secret_key))
    }

    pub fn key_pair_from_secret(&self, secret_key: SecretKey) -> KeyPair {
        let public_key = PublicKey::from_secret_key(&self.secp, &secret_key);
        KeyPair {
            secret_key,
            public_key,
        }
    }

    pub fn key_pair_from_secret_bytes(&self, bytes: &[u8]) -> Result<KeyPair, ChainError> {
        let secret_key = parse_secret_key(bytes).map_err(ChainError::KeyGeneration)?;
        Ok(self.key_pair_from_secret(secret_key))
    }

    /// Signs `payload` (hashed with SHA-256 first) and returns the compact signature.
    /// Secret key bytes that are not a valid secp256k1 scalar are a signing error.
    pub fn sign(&self, payload: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, ChainError> {
        let secret_key = parse_secret_key(secret_key).map_err(ChainError::Signing)?;
        let digest = Sha256::digest(payload);
        let message = Message::from_digest_slice(&digest)
            .map_err(|e| ChainError::Signing(format!("Failed to create message: {}", e)))?;

        let signature = self.secp.sign_ecdsa(&message, &secret_key);
        Ok(signature.serialize_compact().to_vec())
    }

    /// Returns `Ok(false)` for any signature that does not verify, including ones
    /// that are structurally invalid. Only an unusable public key is an error.
    pub fn verify(
        &self,
        payload: &[u8],
        signature: &[u8],
        public_key: &PublicKeyBytes,
    ) -> Result<bool, ChainError> {
        let public_key = PublicKey::from_slice(public_key.as_bytes())
            .map_err(|e| ChainError::Verification(format!("Invalid public key: {}", e)))?;

        if signature.len() != COMPACT_SIGNATURE_SIZE {
            return Ok(false);
        }
        let signature = match Signature::from_compact(signature) {
            Ok(sig) => sig,
            Err(_) => return Ok(false),
        };

        let digest = Sha256::digest(payload);
        let message = Message::from_digest_slice(&digest)
            .map_err(|e| ChainError::Verification(format!("Failed to create message: {}", e)))?;

        Ok(self
            .secp
            .verify_ecdsa(&message, &signature, &public_key)
            .is_ok())
    }
}

fn parse_secret_key(bytes: &[u8]) -> Result<SecretKey, String> {
    SecretKey::from_slice(bytes).map_err(|e| {
        if bytes.len() != SECRET_KEY_SIZE {
            format!(
                "Secret key must be {} bytes, got {}",
                SECRET_KEY_SIZE,
                bytes.len()
            )
        } else {
            format!("Invalid secret key bytes: {}", e)
        }
    })
}

/// Address of a public key: lowercase hex SHA-256 of its compressed encoding.
pub fn derive_address(public_key: &PublicKeyBytes) -> Result<WalletAddress, ChainError> {
    WalletAddress::new(hex::encode(Sha256::digest(public_key.as_bytes())))
}

/// [`AddressOracle`] for the SHA-256-of-public-key addressing scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256AddressDeriver;

impl AddressOracle for Sha256AddressDeriver {
    fn derive_and_compare(&self, address: &WalletAddress, public_key: &PublicKeyBytes) -> bool {
        derive_address(public_key)
            .map(|derived| &derived == address)
            .unwrap_or(false)
    }
}
