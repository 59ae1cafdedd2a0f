//! Read-only capabilities the transaction admission pipeline consumes.
//!
//! Each trait may be backed by any storage; the pipeline only ever calls these
//! methods and never mutates a collaborator.

use crate::crypto::PublicKeyBytes;
use crate::primitives::{Amount, Hash, WalletAddress};

pub trait AddressOracle: Send + Sync {
    /// True iff `address` is derivable from `public_key` under the chain's
    /// addressing scheme.
    fn derive_and_compare(&self, address: &WalletAddress, public_key: &PublicKeyBytes) -> bool;
}

pub trait PolicyProvider: Send + Sync {
    fn is_blocked(&self, address: &WalletAddress) -> bool;
    fn max_amount(&self) -> Amount;
    /// Byte ceiling for the full canonical transaction payload.
    fn max_tx_size(&self) -> usize;
}

pub trait AccountOracle: Send + Sync {
    /// Confirmed balance.
    fn balance(&self, address: &WalletAddress) -> u64;
    /// Sum of outgoing amounts not yet settled in a block.
    fn pending(&self, address: &WalletAddress) -> u64;
}

pub trait MempoolOracle: Send + Sync {
    fn contains(&self, tx_id: &Hash) -> bool;
}
