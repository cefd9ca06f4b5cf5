//! Reference in-memory asset ledger for the Timevault stack. The account
//! arithmetic lives in `account`, while `memory` wires it up behind the
//! `AssetLedger` boundary.

mod account;
mod memory;

pub use account::Account;
pub use memory::MemoryLedger;
