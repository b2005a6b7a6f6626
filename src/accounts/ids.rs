use std::fmt;

use serde::{Deserialize, Serialize};

/// A 256-bit ledger identity. The all-zero value means "unknown/none" and is
/// never stored in either the priority or the blocking set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Account(pub [u8; 32]);

/// A 256-bit block identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockHash(pub [u8; 32]);

impl Account {
    pub const ZERO: Account = Account([0u8; 32]);

    pub fn is_zero(&self) -> bool {
        *self == Account::ZERO
    }
}

impl BlockHash {
    pub const ZERO: BlockHash = BlockHash([0u8; 32]);

    pub fn is_zero(&self) -> bool {
        *self == BlockHash::ZERO
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", hex::encode(self.0))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", hex::encode(self.0))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
pub(crate) fn test_account(tag: u8) -> Account {
    let mut bytes = [0u8; 32];
    bytes[31] = tag;
    Account(bytes)
}

#[cfg(test)]
pub(crate) fn test_hash(tag: u8) -> BlockHash {
    let mut bytes = [0u8; 32];
    bytes[31] = tag;
    BlockHash(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_account_is_zero() {
        assert!(Account::ZERO.is_zero());
        assert!(Account::default().is_zero());
    }

    #[test]
    fn nonzero_account_is_not_zero() {
        assert!(!test_account(1).is_zero());
    }

    #[test]
    fn display_uses_lowercase_hex() {
        let a = test_account(0xab);
        assert!(a.to_string().ends_with("ab"));
        assert_eq!(a.to_string().len(), 64);
    }
}
