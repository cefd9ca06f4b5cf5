use crate::ledger::PrincipalId;

/// Notification appended to the vault's event stream after a successful
/// state change. Events are recorded only once the operation's ledger
/// interaction has gone through; a failed call records nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    Locked { amount: u64, unlock_time: u64 },
    Relocked { unlock_time: u64 },
    Withdrawn { recipient: PrincipalId, amount: u64 },
}
