use std::sync::Arc;
use timevault_core::{
    AssetHandle, ManualClock, PrincipalId, TimelockVault, TimevaultError, VaultEvent,
};
use timevault_ledger::MemoryLedger;

const T0: u64 = 1_700_000_000;

fn alice() -> PrincipalId {
    PrincipalId::from("alice")
}

fn setup() -> (
    Arc<MemoryLedger>,
    ManualClock,
    TimelockVault<Arc<MemoryLedger>, ManualClock>,
) {
    timevault_core::logging::init("warn");

    let ledger = Arc::new(MemoryLedger::new(AssetHandle::from("token:ALPHA")));
    let clock = ManualClock::at(T0);
    let vault = TimelockVault::new(
        AssetHandle::from("token:ALPHA"),
        alice(),
        Arc::clone(&ledger),
        clock.clone(),
    )
    .unwrap();
    (ledger, clock, vault)
}

#[test]
fn full_lifecycle_against_the_memory_ledger() {
    let (ledger, clock, vault) = setup();
    ledger.deposit(&alice(), 1500).unwrap();
    ledger.authorize(&alice(), 1000);

    // Arm the lock: funds leave the owner's account for custody.
    vault.lock(&alice(), 1000, T0 + 3600).unwrap();
    assert_eq!(vault.locked_amount(), 1000);
    assert_eq!(vault.unlock_time(), T0 + 3600);
    assert_eq!(ledger.balance_of(&alice()), 500);
    assert_eq!(ledger.custody_balance(), 1000);

    // Before maturity nothing comes back out.
    clock.set(T0 + 1800);
    let err = vault.withdraw(&alice(), 100).unwrap_err();
    assert!(matches!(err, TimevaultError::StillLocked { .. }));
    assert_eq!(ledger.custody_balance(), 1000);

    // After maturity a partial withdrawal leaves the maturity untouched.
    clock.set(T0 + 3700);
    vault.withdraw(&alice(), 400).unwrap();
    assert_eq!(vault.locked_amount(), 600);
    assert_eq!(vault.unlock_time(), T0 + 3600);
    assert_eq!(ledger.balance_of(&alice()), 900);

    // Withdraw the rest and re-arm the (now empty) slot in one step.
    vault
        .withdraw_and_relock(&alice(), 600, T0 + 3700 + 7200)
        .unwrap();
    assert_eq!(vault.locked_amount(), 0);
    assert_eq!(vault.unlock_time(), T0 + 3700 + 7200);
    assert_eq!(ledger.balance_of(&alice()), 1500);
    assert_eq!(ledger.custody_balance(), 0);

    assert_eq!(
        vault.drain_events(),
        vec![
            VaultEvent::Locked {
                amount: 1000,
                unlock_time: T0 + 3600
            },
            VaultEvent::Withdrawn {
                recipient: alice(),
                amount: 400
            },
            VaultEvent::Withdrawn {
                recipient: alice(),
                amount: 600
            },
            VaultEvent::Relocked {
                unlock_time: T0 + 3700 + 7200
            },
        ]
    );

    // The slot emptied, so a fresh epoch is permitted.
    ledger.authorize(&alice(), 500);
    vault.lock(&alice(), 500, T0 + 20_000).unwrap();
    assert_eq!(vault.locked_amount(), 500);
    assert_eq!(ledger.custody_balance(), 500);
}

#[test]
fn unauthorised_pull_leaves_the_vault_empty() {
    let (ledger, _clock, vault) = setup();
    ledger.deposit(&alice(), 1000).unwrap();

    // No authorisation was granted, so the ledger refuses the pull and the
    // vault records nothing.
    let err = vault.lock(&alice(), 1000, T0 + 3600).unwrap_err();
    assert!(matches!(err, TimevaultError::TransferFailed(_)));
    assert_eq!(vault.locked_amount(), 0);
    assert_eq!(ledger.balance_of(&alice()), 1000);
    assert_eq!(ledger.custody_balance(), 0);
    assert!(vault.events().is_empty());
}

#[test]
fn non_owner_cannot_touch_the_custodied_funds() {
    let (ledger, clock, vault) = setup();
    ledger.deposit(&alice(), 1000).unwrap();
    ledger.authorize(&alice(), 1000);
    vault.lock(&alice(), 1000, T0 + 3600).unwrap();
    clock.set(T0 + 3700);

    let mallory = PrincipalId::from("mallory");
    let err = vault.withdraw_all(&mallory).unwrap_err();
    assert!(matches!(err, TimevaultError::AccessDenied(_)));
    assert_eq!(vault.locked_amount(), 1000);
    assert_eq!(ledger.custody_balance(), 1000);
    assert_eq!(ledger.balance_of(&mallory), 0);
}
