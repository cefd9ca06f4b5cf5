//! In-memory `AssetLedger` implementation. It keeps per-principal accounts
//! and a custody pool for a single asset, and refuses any transfer the
//! balances or authorisations cannot cover.

use crate::account::Account;
use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use timevault_core::{AssetHandle, AssetLedger, PrincipalId, TimevaultError, TimevaultResult};

#[derive(Debug, Default)]
struct LedgerState {
    accounts: HashMap<PrincipalId, Account>,
    custody: u64,
}

/// Reference system of record for one fungible asset.
///
/// Principals deposit funds and authorise the custodian to pull up to a
/// limit, mirroring the allowance discipline of on-chain token ledgers.
/// Unlike the vault, the ledger may be shared across threads, so its state
/// sits behind a mutex.
#[derive(Debug)]
pub struct MemoryLedger {
    asset: AssetHandle,
    state: Mutex<LedgerState>,
}

impl MemoryLedger {
    pub fn new(asset: AssetHandle) -> Self {
        Self {
            asset,
            state: Mutex::new(LedgerState::default()),
        }
    }

    pub fn asset(&self) -> &AssetHandle {
        &self.asset
    }

    /// Credit `amount` to `principal`, creating the account on first use.
    pub fn deposit(&self, principal: &PrincipalId, amount: u64) -> TimevaultResult<()> {
        let mut state = self.state();
        state
            .accounts
            .entry(principal.clone())
            .or_default()
            .credit(amount)
    }

    /// Set the amount the custodian may pull from `principal`. Replaces any
    /// earlier authorisation rather than accumulating.
    pub fn authorize(&self, principal: &PrincipalId, amount: u64) {
        let mut state = self.state();
        state.accounts.entry(principal.clone()).or_default().authorized = amount;
    }

    pub fn balance_of(&self, principal: &PrincipalId) -> u64 {
        self.state()
            .accounts
            .get(principal)
            .map(|account| account.balance)
            .unwrap_or(0)
    }

    pub fn authorized_amount(&self, principal: &PrincipalId) -> u64 {
        self.state()
            .accounts
            .get(principal)
            .map(|account| account.authorized)
            .unwrap_or(0)
    }

    pub fn custody_balance(&self) -> u64 {
        self.state().custody
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AssetLedger for MemoryLedger {
    fn transfer_in(&self, from: &PrincipalId, amount: u64) -> TimevaultResult<()> {
        let mut state = self.state();
        let new_custody = state.custody.checked_add(amount).ok_or_else(|| {
            TimevaultError::TransferFailed("custody balance overflow".to_string())
        })?;
        let account = state.accounts.get_mut(from).ok_or_else(|| {
            TimevaultError::TransferFailed(format!("no account for principal `{}`", from))
        })?;
        account.debit_authorized(amount)?;
        state.custody = new_custody;
        debug!("pulled {} of {} from {}", amount, self.asset, from);
        Ok(())
    }

    fn transfer_out(&self, to: &PrincipalId, amount: u64) -> TimevaultResult<()> {
        let mut state = self.state();
        if state.custody < amount {
            return Err(TimevaultError::TransferFailed(format!(
                "custody balance {} cannot cover {}",
                state.custody, amount
            )));
        }
        state.accounts.entry(to.clone()).or_default().credit(amount)?;
        state.custody -= amount;
        debug!("pushed {} of {} to {}", amount, self.asset, to);
        Ok(())
    }
}
