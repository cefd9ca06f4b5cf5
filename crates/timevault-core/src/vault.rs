//! The custodial time-lock state machine. One vault holds one lock slot for
//! one asset on behalf of one owner; funds move through the injected
//! [`AssetLedger`] and maturity is read from the injected [`Clock`].

use crate::clock::Clock;
use crate::config::VaultConfig;
use crate::error::{TimevaultError, TimevaultResult};
use crate::events::VaultEvent;
use crate::ledger::{AssetHandle, AssetLedger, PrincipalId};
use log::{debug, info};
use std::cell::{Cell, RefCell};

/// Balance and maturity of the single lock slot.
///
/// `unlock_time` is meaningful only while `locked_amount > 0`; once the slot
/// empties it keeps its last value rather than being reset, so readers can
/// still see when the previous epoch matured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockRecord {
    pub locked_amount: u64,
    pub unlock_time: u64,
}

impl LockRecord {
    pub fn is_empty(&self) -> bool {
        self.locked_amount == 0
    }
}

/// Scoped "operation in flight" marker. Acquiring it while another guarded
/// operation is mid-execution on the same vault fails with `ReentrantCall`;
/// the flag is released on every exit path, error paths included.
struct OperationGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> OperationGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> TimevaultResult<Self> {
        if flag.get() {
            return Err(TimevaultError::ReentrantCall);
        }
        flag.set(true);
        Ok(Self { flag })
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Single-slot custodial time-lock over an injected asset ledger and clock.
///
/// All execution is serialized per vault; the state lives in a `Cell` so no
/// borrow is ever held across an external ledger call, and the reentrancy
/// guard rejects any callback that tries to re-enter an asset-moving
/// operation before the outer one returns.
#[derive(Debug)]
pub struct TimelockVault<L: AssetLedger, C: Clock> {
    asset: AssetHandle,
    owner: PrincipalId,
    ledger: L,
    clock: C,
    record: Cell<LockRecord>,
    in_flight: Cell<bool>,
    events: RefCell<Vec<VaultEvent>>,
}

impl<L: AssetLedger, C: Clock> TimelockVault<L, C> {
    /// Build a vault custodying `asset` for `owner`. Fails with
    /// `InvalidAsset` when the asset handle is empty.
    pub fn new(
        asset: AssetHandle,
        owner: PrincipalId,
        ledger: L,
        clock: C,
    ) -> TimevaultResult<Self> {
        if asset.is_empty() {
            return Err(TimevaultError::InvalidAsset);
        }
        Ok(Self {
            asset,
            owner,
            ledger,
            clock,
            record: Cell::new(LockRecord::default()),
            in_flight: Cell::new(false),
            events: RefCell::new(Vec::new()),
        })
    }

    /// Build a vault whose identity fields come from configuration.
    pub fn from_config(config: &VaultConfig, ledger: L, clock: C) -> TimevaultResult<Self> {
        config.validate()?;
        Self::new(config.asset_handle(), config.owner(), ledger, clock)
    }

    /// Pull `amount` from the owner into custody and arm the lock.
    /// Permitted only while the slot is empty; a failed pull leaves the
    /// vault untouched.
    pub fn lock(
        &self,
        caller: &PrincipalId,
        amount: u64,
        unlock_time: u64,
    ) -> TimevaultResult<()> {
        self.require_owner(caller)?;
        let _guard = OperationGuard::acquire(&self.in_flight)?;

        let record = self.record.get();
        if !record.is_empty() {
            return Err(TimevaultError::AlreadyLocked);
        }
        if amount == 0 {
            return Err(TimevaultError::InvalidAmount(
                "lock amount must be greater than zero".to_string(),
            ));
        }
        let now = self.clock.now();
        require_future(unlock_time, now)?;

        self.ledger.transfer_in(&self.owner, amount)?;

        self.record.set(LockRecord {
            locked_amount: amount,
            unlock_time,
        });
        self.push_event(VaultEvent::Locked {
            amount,
            unlock_time,
        });
        info!(
            "locked {} of {} for {} until {}",
            amount, self.asset, self.owner, unlock_time
        );
        Ok(())
    }

    /// Re-arm the maturity of the active lock without moving any funds.
    /// Only a matured lock can be extended.
    pub fn relock(&self, caller: &PrincipalId, unlock_time: u64) -> TimevaultResult<()> {
        self.require_owner(caller)?;

        let record = self.record.get();
        let now = self.require_matured(&record)?;
        if record.is_empty() {
            return Err(TimevaultError::NothingLocked);
        }
        require_future(unlock_time, now)?;

        self.record.set(LockRecord {
            unlock_time,
            ..record
        });
        self.push_event(VaultEvent::Relocked { unlock_time });
        info!("relocked {} until {}", self.asset, unlock_time);
        Ok(())
    }

    /// Release `amount` of the matured lock back to the owner. The balance
    /// is decremented before the ledger push, so a reentrant callback can
    /// never observe the pre-withdrawal balance; if the push fails the
    /// prior record is restored and the call has no effect.
    pub fn withdraw(&self, caller: &PrincipalId, amount: u64) -> TimevaultResult<()> {
        self.require_owner(caller)?;
        let _guard = OperationGuard::acquire(&self.in_flight)?;

        let record = self.record.get();
        self.require_matured(&record)?;
        if amount == 0 {
            return Err(TimevaultError::InvalidAmount(
                "withdrawal amount must be greater than zero".to_string(),
            ));
        }
        let remaining = record.locked_amount.checked_sub(amount).ok_or_else(|| {
            TimevaultError::InvalidAmount(format!(
                "withdrawal of {} exceeds locked balance of {}",
                amount, record.locked_amount
            ))
        })?;

        self.record.set(LockRecord {
            locked_amount: remaining,
            ..record
        });
        if let Err(err) = self.ledger.transfer_out(&self.owner, amount) {
            self.record.set(record);
            return Err(err);
        }

        self.push_event(VaultEvent::Withdrawn {
            recipient: self.owner.clone(),
            amount,
        });
        info!(
            "withdrew {} of {} to {}; {} remains locked",
            amount, self.asset, self.owner, remaining
        );
        Ok(())
    }

    /// Release the entire matured balance back to the owner, emptying the
    /// slot. Returns the amount withdrawn.
    pub fn withdraw_all(&self, caller: &PrincipalId) -> TimevaultResult<u64> {
        self.require_owner(caller)?;
        let _guard = OperationGuard::acquire(&self.in_flight)?;

        let record = self.record.get();
        self.require_matured(&record)?;
        if record.is_empty() {
            return Err(TimevaultError::NothingToWithdraw);
        }

        let amount = record.locked_amount;
        self.record.set(LockRecord {
            locked_amount: 0,
            ..record
        });
        if let Err(err) = self.ledger.transfer_out(&self.owner, amount) {
            self.record.set(record);
            return Err(err);
        }

        self.push_event(VaultEvent::Withdrawn {
            recipient: self.owner.clone(),
            amount,
        });
        info!("withdrew all {} of {} to {}", amount, self.asset, self.owner);
        Ok(amount)
    }

    /// Release `amount` and re-arm the remainder under a new maturity in one
    /// atomic step: both the decrement and the new unlock time are applied
    /// before the ledger push, and both are restored if the push fails.
    pub fn withdraw_and_relock(
        &self,
        caller: &PrincipalId,
        amount: u64,
        unlock_time: u64,
    ) -> TimevaultResult<()> {
        self.require_owner(caller)?;
        let _guard = OperationGuard::acquire(&self.in_flight)?;

        let record = self.record.get();
        let now = self.require_matured(&record)?;
        if amount == 0 {
            return Err(TimevaultError::InvalidAmount(
                "withdrawal amount must be greater than zero".to_string(),
            ));
        }
        let remaining = record.locked_amount.checked_sub(amount).ok_or_else(|| {
            TimevaultError::InvalidAmount(format!(
                "withdrawal of {} exceeds locked balance of {}",
                amount, record.locked_amount
            ))
        })?;
        require_future(unlock_time, now)?;

        self.record.set(LockRecord {
            locked_amount: remaining,
            unlock_time,
        });
        if let Err(err) = self.ledger.transfer_out(&self.owner, amount) {
            self.record.set(record);
            return Err(err);
        }

        self.push_event(VaultEvent::Withdrawn {
            recipient: self.owner.clone(),
            amount,
        });
        self.push_event(VaultEvent::Relocked { unlock_time });
        info!(
            "withdrew {} of {} and relocked {} until {}",
            amount, self.asset, remaining, unlock_time
        );
        Ok(())
    }

    /// Quantity currently held and not yet released.
    pub fn locked_amount(&self) -> u64 {
        self.record.get().locked_amount
    }

    /// Maturity of the active lock epoch. Stale (but preserved) once the
    /// slot has emptied.
    pub fn unlock_time(&self) -> u64 {
        self.record.get().unlock_time
    }

    pub fn owner(&self) -> &PrincipalId {
        &self.owner
    }

    pub fn asset(&self) -> &AssetHandle {
        &self.asset
    }

    /// Snapshot of the notification stream, oldest first.
    pub fn events(&self) -> Vec<VaultEvent> {
        self.events.borrow().clone()
    }

    /// Drain the notification stream, handing accumulated events to the
    /// caller.
    pub fn drain_events(&self) -> Vec<VaultEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    fn require_owner(&self, caller: &PrincipalId) -> TimevaultResult<()> {
        if caller != &self.owner {
            return Err(TimevaultError::AccessDenied(caller.to_string()));
        }
        Ok(())
    }

    fn require_matured(&self, record: &LockRecord) -> TimevaultResult<u64> {
        let now = self.clock.now();
        if now < record.unlock_time {
            return Err(TimevaultError::StillLocked {
                now,
                unlock_time: record.unlock_time,
            });
        }
        Ok(now)
    }

    fn push_event(&self, event: VaultEvent) {
        debug!("event: {:?}", event);
        self.events.borrow_mut().push(event);
    }
}

fn require_future(unlock_time: u64, now: u64) -> TimevaultResult<()> {
    if unlock_time <= now {
        return Err(TimevaultError::InvalidUnlockTime {
            requested: unlock_time,
            now,
        });
    }
    Ok(())
}
