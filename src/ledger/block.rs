use crate::accounts::{Account, BlockHash};

/// The five block types a real ledger distinguishes. Only `Open`, `Change`
/// and `State` blocks name an owning account directly; `Send` and `Receive`
/// blocks defer to their predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Send,
    Receive,
    Open,
    Change,
    State,
}

/// `account` is only populated for `Open`/`Change`/`State` blocks, mirroring
/// the legacy `send`/`receive` block formats that carry no explicit account
/// field — their owning account can only be learned by walking back to the
/// chain's `Open` block.
#[derive(Debug, Clone)]
pub struct Block {
    pub hash: BlockHash,
    pub block_type: BlockType,
    pub previous: BlockHash,
    pub account: Option<Account>,
}

/// Walks `previous` pointers through `Send`/`Receive` blocks until reaching
/// a block type that names an owning account, returning that account.
/// `lookup` is expected to be a cheap in-memory map; this only exists to
/// synthesize realistic `dependency_update` signals for tests and the demo
/// binary, it is never consulted by the account-set engine itself.
pub fn owning_account(start: &Block, lookup: impl Fn(BlockHash) -> Option<Block>) -> Option<Account> {
    let mut current = start.clone();
    loop {
        match current.block_type {
            BlockType::Open | BlockType::Change | BlockType::State => return current.account,
            BlockType::Send | BlockType::Receive => {
                current = lookup(current.previous)?;
            }
        }
    }
}
