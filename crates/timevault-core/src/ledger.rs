use crate::error::TimevaultResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Identity of a principal known to the external asset ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Reference to the single fungible asset held in custody, as the external
/// ledger names it. Set once at construction and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetHandle(String);

impl AssetHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetHandle {
    fn from(handle: &str) -> Self {
        Self(handle.to_string())
    }
}

/// Abstraction over the external fungible-asset ledger.
///
/// Implementations are expected to provide a thin, testable surface over the
/// real system of record, so the vault can be exercised against a fake ledger
/// that can be made to fail on demand. Both operations are all-or-nothing:
/// a returned error means no balance moved.
pub trait AssetLedger {
    /// Pull previously authorised funds from `from` into custody.
    fn transfer_in(&self, from: &PrincipalId, amount: u64) -> TimevaultResult<()>;

    /// Push funds out of custody to `to`.
    fn transfer_out(&self, to: &PrincipalId, amount: u64) -> TimevaultResult<()>;
}

impl<L: AssetLedger + ?Sized> AssetLedger for &L {
    fn transfer_in(&self, from: &PrincipalId, amount: u64) -> TimevaultResult<()> {
        (**self).transfer_in(from, amount)
    }

    fn transfer_out(&self, to: &PrincipalId, amount: u64) -> TimevaultResult<()> {
        (**self).transfer_out(to, amount)
    }
}

impl<L: AssetLedger + ?Sized> AssetLedger for Rc<L> {
    fn transfer_in(&self, from: &PrincipalId, amount: u64) -> TimevaultResult<()> {
        (**self).transfer_in(from, amount)
    }

    fn transfer_out(&self, to: &PrincipalId, amount: u64) -> TimevaultResult<()> {
        (**self).transfer_out(to, amount)
    }
}

impl<L: AssetLedger + ?Sized> AssetLedger for Arc<L> {
    fn transfer_in(&self, from: &PrincipalId, amount: u64) -> TimevaultResult<()> {
        (**self).transfer_in(from, amount)
    }

    fn transfer_out(&self, to: &PrincipalId, amount: u64) -> TimevaultResult<()> {
        (**self).transfer_out(to, amount)
    }
}
