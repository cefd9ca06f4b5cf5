use crate::error::{TimevaultError, TimevaultResult};
use crate::ledger::{AssetHandle, PrincipalId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The `[vault]` section: who owns the lock and which asset it custodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSection {
    pub asset: String,

    pub owner: String,

    /// Suggested lock duration for tooling that arms the vault; the state
    /// machine itself only ever sees absolute unlock instants.
    #[serde(default)]
    pub default_lock_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    pub vault: VaultSection,

    #[serde(skip)]
    pub path: PathBuf,
}

impl VaultConfig {
    /// Load a configuration file, choosing the parser by extension
    /// (`.toml` for TOML, anything else is treated as YAML).
    pub fn load<P: AsRef<Path>>(path: P) -> TimevaultResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut cfg = if matches!(path.extension().and_then(|ext| ext.to_str()), Some(ext) if ext.eq_ignore_ascii_case("toml"))
        {
            toml::from_str::<Self>(&contents)?
        } else {
            serde_yaml::from_str::<Self>(&contents)?
        };

        cfg.path = path.to_path_buf();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> TimevaultResult<()> {
        if self.vault.asset.is_empty() {
            return Err(TimevaultError::InvalidConfig(
                "vault.asset must name an external ledger account".to_string(),
            ));
        }
        if self.vault.owner.is_empty() {
            return Err(TimevaultError::InvalidConfig(
                "vault.owner must name the controlling principal".to_string(),
            ));
        }
        Ok(())
    }

    pub fn asset_handle(&self) -> AssetHandle {
        AssetHandle::new(self.vault.asset.clone())
    }

    pub fn owner(&self) -> PrincipalId {
        PrincipalId::new(self.vault.owner.clone())
    }

    pub fn default_lock_duration(&self) -> Option<Duration> {
        self.vault.default_lock_secs.map(Duration::from_secs)
    }
}
