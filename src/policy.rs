//! Admission policy backed by configuration.

use crate::config::PolicyConfig;
use crate::error::ChainError;
use crate::oracle::PolicyProvider;
use crate::primitives::{Amount, WalletAddress};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    max_amount: Amount,
    max_tx_size: usize,
    blocked_addresses: HashSet<WalletAddress>,
}

impl ValidationPolicy {
    pub fn new(
        max_amount: Amount,
        max_tx_size: usize,
        blocked_addresses: impl IntoIterator<Item = WalletAddress>,
    ) -> Self {
        ValidationPolicy {
            max_amount,
            max_tx_size,
            blocked_addresses: blocked_addresses.into_iter().collect(),
        }
    }

    pub fn from_config(config: &PolicyConfig) -> Result<Self, ChainError> {
        let max_amount = Amount::new(config.max_amount)
            .map_err(|e| ChainError::ConfigError(format!("policy.max_amount: {}", e)))?;
        let blocked = config
            .blocked_addresses
            .iter()
            .map(|raw| {
                WalletAddress::new(raw.as_str()).map_err(|e| {
                    ChainError::ConfigError(format!("policy.blocked_addresses: {}", e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(max_amount, config.max_tx_size, blocked))
    }
}

impl PolicyProvider for ValidationPolicy {
    fn is_blocked(&self, address: &WalletAddress) -> bool {
        self.blocked_addresses.contains(address)
    }

    fn max_amount(&self) -> Amount {
        self.max_amount
    }

    fn max_tx_size(&self) -> usize {
        self.max_tx_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_lookup() {
        let blocked = WalletAddress::new("b".repeat(40)).unwrap();
        let allowed = WalletAddress::new("a".repeat(40)).unwrap();
        let policy = ValidationPolicy::new(Amount::new(1000).unwrap(), 10_000, [blocked.clone()]);

        assert!(policy.is_blocked(&blocked));
        assert!(!policy.is_blocked(&allowed));
        assert_eq!(policy.max_amount().value(), 1000);
        assert_eq!(policy.max_tx_size(), 10_000);
    }

    #[test]
    fn test_from_config_rejects_invalid_blocked_address() {
        let config = PolicyConfig {
            max_amount: 1000,
            max_tx_size: 10_000,
            blocked_addresses: vec!["short".to_string()],
        };
        assert!(matches!(
            ValidationPolicy::from_config(&config),
            Err(ChainError::ConfigError(_))
        ));
    }
}
