use thiserror::Error;

/// Result alias for core operations.
pub type TimevaultResult<T> = Result<T, TimevaultError>;

#[derive(Error, Debug)]
pub enum TimevaultError {
    #[error("[TV1000] io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[TV1001] toml config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("[TV1002] yaml config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("[TV1100] configuration error: {0}")]
    InvalidConfig(String),

    #[error("[TV1200] caller `{0}` is not the vault owner")]
    AccessDenied(String),

    #[error("[TV1300] an active lock already exists; withdraw to zero before locking again")]
    AlreadyLocked,

    #[error("[TV1301] funds are locked until {unlock_time} (now {now})")]
    StillLocked { now: u64, unlock_time: u64 },

    #[error("[TV1302] no active lock to re-arm")]
    NothingLocked,

    #[error("[TV1303] nothing to withdraw")]
    NothingToWithdraw,

    #[error("[TV1400] invalid amount: {0}")]
    InvalidAmount(String),

    #[error("[TV1401] unlock time {requested} is not in the future (now {now})")]
    InvalidUnlockTime { requested: u64, now: u64 },

    #[error("[TV1402] asset handle must name an external ledger account")]
    InvalidAsset,

    #[error("[TV1500] reentrant call into a guarded vault operation")]
    ReentrantCall,

    #[error("[TV2000] asset transfer failed: {0}")]
    TransferFailed(String),
}

impl TimevaultError {
    pub fn code(&self) -> &'static str {
        match self {
            TimevaultError::Io(_) => "TV1000",
            TimevaultError::Toml(_) => "TV1001",
            TimevaultError::Yaml(_) => "TV1002",
            TimevaultError::InvalidConfig(_) => "TV1100",
            TimevaultError::AccessDenied(_) => "TV1200",
            TimevaultError::AlreadyLocked => "TV1300",
            TimevaultError::StillLocked { .. } => "TV1301",
            TimevaultError::NothingLocked => "TV1302",
            TimevaultError::NothingToWithdraw => "TV1303",
            TimevaultError::InvalidAmount(_) => "TV1400",
            TimevaultError::InvalidUnlockTime { .. } => "TV1401",
            TimevaultError::InvalidAsset => "TV1402",
            TimevaultError::ReentrantCall => "TV1500",
            TimevaultError::TransferFailed(_) => "TV2000",
        }
    }
}
