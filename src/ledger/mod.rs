//! Minimal ledger block model, used only to synthesize realistic
//! dependency-resolution signals for tests and the demo binary. None of
//! this is consulted by the account-set engine itself.

pub mod block;

pub use block::{owning_account, Block, BlockType};
