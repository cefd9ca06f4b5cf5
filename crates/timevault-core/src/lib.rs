//! Core building blocks for the Timevault custodial time-lock.
//!
//! The state machine, the asset-ledger boundary, and the ambient concerns
//! (errors, config, logging) live here so downstream crates can plug in a
//! concrete ledger without reimplementing the lock semantics.

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
pub mod logging;
pub mod vault;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{VaultConfig, VaultSection};
pub use error::{TimevaultError, TimevaultResult};
pub use events::VaultEvent;
pub use ledger::{AssetHandle, AssetLedger, PrincipalId};
pub use vault::{LockRecord, TimelockVault};
