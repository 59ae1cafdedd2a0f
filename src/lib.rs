//! ledgerchain - a minimal append-only ledger core
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Block model, chain admission guard and the single-writer ledger
//! - [`transaction`] - Transaction model, create flow and the admission pipeline
//! - [`mempool`] - Pending transaction pool
//!
//! ## Encoding & Cryptography
//! - [`primitives`] - WalletAddress, Amount and Hash value types
//! - [`serializer`] - Canonical transaction payloads
//! - [`hashing`] - Transaction ids and block hashes (SHA-256)
//! - [`crypto`] - Signatures and verification (secp256k1), address derivation
//!
//! ## Collaborators
//! - [`oracle`] - Capability traits consumed by the admission pipeline
//! - [`policy`] - Configured admission limits and block-list
//! - [`accounts`] - Balance lookups
//!
//! ## State & Wiring
//! - [`persistence`] - Chain storage (SQLite and in-memory)
//! - [`node`] - Composition root and submission flow
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod mempool;
pub mod transaction;

// ============================================================================
// Encoding & Cryptography
// ============================================================================
pub mod crypto;
pub mod hashing;
pub mod primitives;
pub mod serializer;

// ============================================================================
// Collaborators
// ============================================================================
pub mod accounts;
pub mod oracle;
pub mod policy;

// ============================================================================
// State & Wiring
// ============================================================================
pub mod node;
pub mod persistence;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
