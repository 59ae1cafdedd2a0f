//! Chain admission guard: does a candidate extend the current tip?
//!
//! The guard is a pure decision over (tip, candidate). It holds no lock and
//! never re-checks the candidate's own hash or its transactions; callers run
//! it inside the ledger's writer lock.

use super::chain::Block;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppendOutcome {
    Accepted,
    /// `candidate.previous_hash` is not the tip's hash.
    RejectedLinkMismatch,
    /// `candidate.index` is not `tip.index + 1`.
    RejectedIndexMismatch,
}

impl AppendOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AppendOutcome::Accepted)
    }
}

/// Linkage is checked before the index, so a candidate wrong on both counts
/// reports `RejectedLinkMismatch`.
pub fn check_extends(tip: &Block, candidate: &Block) -> AppendOutcome {
    if candidate.previous_hash != tip.hash {
        warn!(
            "Rejecting block {}: previous hash {} does not match tip hash {}",
            candidate.index, candidate.previous_hash, tip.hash
        );
        return AppendOutcome::RejectedLinkMismatch;
    }
    if tip.index.checked_add(1) != Some(candidate.index) {
        warn!(
            "Rejecting block: expected index {}, got {}",
            tip.index.saturating_add(1),
            candidate.index
        );
        return AppendOutcome::RejectedIndexMismatch;
    }
    AppendOutcome::Accepted
}
