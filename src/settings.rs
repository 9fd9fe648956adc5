use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::{catalog::EmotionCatalog, locale::Locale};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    pub haptic_ms: u64,
    pub notice_secs: u64,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            haptic_ms: 100,
            notice_secs: 4,
        }
    }
}

impl FeedbackSettings {
    pub fn haptic(&self) -> Duration {
        Duration::from_millis(self.haptic_ms)
    }

    pub fn notice(&self) -> Duration {
        Duration::from_secs(self.notice_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub locale: Locale,
    pub feedback: FeedbackSettings,
    pub catalog: EmotionCatalog,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            parse_settings(&contents).unwrap_or_else(|err| {
                warn!("Ignoring settings at {}: {err:#}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn snapshot(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn locale(&self) -> Locale {
        self.read().locale
    }

    pub fn catalog(&self) -> EmotionCatalog {
        self.read().catalog.clone()
    }

    pub fn update(&self, settings: UserSettings) -> Result<()> {
        settings
            .catalog
            .validate()
            .context("refusing to save invalid emotion catalog")?;

        let mut guard = self.write();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create settings directory {}", parent.display())
                })?;
            }
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

fn parse_settings(contents: &str) -> Result<UserSettings> {
    let settings: UserSettings =
        serde_json::from_str(contents).context("settings are not valid JSON")?;
    settings.catalog.validate()?;
    Ok(settings)
}
