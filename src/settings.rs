use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::RwLock,
    time::Duration,
};

use log::warn;

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSettings {
    pub refresh_interval_secs: u64,
    /// Where exports land when no explicit output path is given
    pub export_dir: Option<PathBuf>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            export_dir: None,
        }
    }
}

impl DashboardSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(MIN_REFRESH_INTERVAL_SECS))
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<DashboardSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(data) => data,
                Err(err) => {
                    warn!("Ignoring unreadable settings at {}: {err}", path.display());
                    DashboardSettings::default()
                }
            }
        } else {
            DashboardSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn dashboard(&self) -> DashboardSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_refresh_interval(&self, secs: u64) -> Result<DashboardSettings> {
        if secs < MIN_REFRESH_INTERVAL_SECS {
            bail!("refresh interval must be at least {MIN_REFRESH_INTERVAL_SECS} second(s)");
        }
        self.update(|settings| settings.refresh_interval_secs = secs)
    }

    pub fn set_export_dir(&self, dir: Option<PathBuf>) -> Result<DashboardSettings> {
        self.update(|settings| settings.export_dir = dir)
    }

    fn update(&self, apply: impl FnOnce(&mut DashboardSettings)) -> Result<DashboardSettings> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        let mut next = guard.clone();
        apply(&mut next);
        self.persist(&next)?;
        *guard = next.clone();
        Ok(next)
    }

    fn persist(&self, data: &DashboardSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
