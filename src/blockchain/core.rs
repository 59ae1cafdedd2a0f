// core.rs splits chain responsibilities into submodules: the block model,
// the admission guard and the single-writer ledger.
pub mod chain;
pub mod guard;
pub mod ledger;

pub use chain::*;
pub use guard::*;
pub use ledger::*;
