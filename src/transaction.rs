//! Transactions: the model and create flow live in `types`, the admission pipeline in `validation`

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{ErrorCode, TransactionValidator, ValidationResult, ValidationStatus};
