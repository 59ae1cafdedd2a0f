//! Transaction model and the signing "create" flow
use crate::crypto::{KeyPair, PublicKeyBytes, SignatureEngine};
use crate::error::ChainError;
use crate::hashing;
use crate::primitives::{Amount, Hash, WalletAddress};
use crate::serializer;
use tracing::{debug, error, info};

/// A signed transfer. All five fields are always present; value-level invariants
/// are carried by the field types themselves.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    pub from: WalletAddress,
    pub to: WalletAddress,
    pub amount: Amount,
    #[serde(with = "serde_bytes")]
    pub signature: Vec<u8>,
    pub public_key: PublicKeyBytes,
}

impl Transaction {
    pub fn new(
        from: WalletAddress,
        to: WalletAddress,
        amount: Amount,
        signature: Vec<u8>,
        public_key: PublicKeyBytes,
    ) -> Self {
        Transaction {
            from,
            to,
            amount,
            signature,
            public_key,
        }
    }

    /// Signs the unassigned payload with `keypair` and checks the fresh signature
    /// before returning. A transaction that fails its own check is never handed out.
    pub fn create(
        engine: &SignatureEngine,
        from: WalletAddress,
        to: WalletAddress,
        amount: Amount,
        keypair: &KeyPair,
    ) -> Result<Self, ChainError> {
        info!(
            "Transaction creation attempt: from={}, to={}, amount={}",
            from, to, amount
        );

        let payload = serializer::unassigned_payload(&from, &to, amount);
        let signature = engine.sign(&payload, &keypair.secret_bytes())?;
        debug!("Signature generated for transaction");

        let tx = Transaction::new(from, to, amount, signature, keypair.public_key_bytes());
        if !tx.has_valid_signature(engine)? {
            error!("Freshly created transaction has an invalid signature; rejecting it");
            return Err(ChainError::Signing(
                "Invalid signature. Transaction rejected".to_string(),
            ));
        }

        info!("Transaction created and verified");
        Ok(tx)
    }

    /// The bytes that are signed and hashed into the transaction id.
    pub fn unassigned_payload(&self) -> Vec<u8> {
        serializer::unassigned_payload(&self.from, &self.to, self.amount)
    }

    pub fn serialized(&self) -> Vec<u8> {
        serializer::serialized_transaction(self)
    }

    pub fn id(&self) -> Result<Hash, ChainError> {
        hashing::transaction_id(&self.unassigned_payload())
    }

    pub fn has_valid_signature(&self, engine: &SignatureEngine) -> Result<bool, ChainError> {
        engine.verify(&self.unassigned_payload(), &self.signature, &self.public_key)
    }
}
