//! JSON-file preference backend for the CLI.
//!
//! Settings live in a single `settings.json` under the data directory:
//!
//! ```json
//! {
//!   "goal_preferences": [{"stat_name": "calories", "is_enabled": true}],
//!   "user_settings": {"streak_metric": "workouts"}
//! }
//! ```
//!
//! A missing file reads as every stat enabled. Writes go through a sidecar
//! lock file and an atomic temp-file rename, so concurrent invocations
//! serialize per write and the last one wins.

use async_trait::async_trait;
use fittrack_core::{Error, PreferenceBackend, Result, StatKey, StoredPreference};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    goal_preferences: Vec<StoredPreference>,
    #[serde(default)]
    user_settings: BTreeMap<String, String>,
}

impl SettingsFile {
    fn seeded() -> Self {
        Self {
            goal_preferences: StatKey::ALL
                .into_iter()
                .map(|stat| StoredPreference {
                    stat_name: stat.as_str().to_string(),
                    is_enabled: true,
                })
                .collect(),
            user_settings: BTreeMap::new(),
        }
    }

    /// Read the settings file under a shared lock
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No settings file at {:?}, seeding defaults", path);
            return Ok(Self::seeded());
        }

        let file = File::open(path)?;
        file.lock_shared()?;
        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        serde_json::from_str(&contents).map_err(|e| {
            Error::Persistence(format!("settings file {:?} is unreadable: {}", path, e))
        })
    }

    /// Atomically replace the settings file
    fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Persistence(format!("settings path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Load, modify and save while holding the exclusive sidecar lock
    fn update<F>(path: &Path, f: F) -> Result<()>
    where
        F: FnOnce(&mut SettingsFile),
    {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path.with_extension("lock"))?;
        lock.lock_exclusive()?;

        let result = Self::load(path).and_then(|mut settings| {
            f(&mut settings);
            settings.save(path)
        });

        lock.unlock()?;
        result
    }
}

/// [`PreferenceBackend`] over a JSON settings file
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || f(&path))
            .await
            .map_err(|e| Error::Persistence(format!("settings task failed: {}", e)))?
    }
}

#[async_trait]
impl PreferenceBackend for JsonFileBackend {
    async fn goal_preferences(&self) -> Result<Vec<StoredPreference>> {
        self.blocking(|path| Ok(SettingsFile::load(path)?.goal_preferences))
            .await
    }

    async fn update_goal_preference(&self, stat_name: &str, is_enabled: bool) -> Result<()> {
        let stat_name = stat_name.to_string();
        self.blocking(move |path| {
            SettingsFile::update(path, |settings| {
                match settings
                    .goal_preferences
                    .iter_mut()
                    .find(|p| p.stat_name == stat_name)
                {
                    Some(row) => row.is_enabled = is_enabled,
                    None => settings.goal_preferences.push(StoredPreference {
                        stat_name,
                        is_enabled,
                    }),
                }
            })
        })
        .await
    }

    async fn user_setting(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.blocking(move |path| Ok(SettingsFile::load(path)?.user_settings.get(&key).cloned()))
            .await
    }

    async fn update_user_setting(&self, key: &str, value: &str) -> Result<()> {
        let (key, value) = (key.to_string(), value.to_string());
        self.blocking(move |path| {
            SettingsFile::update(path, |settings| {
                settings.user_settings.insert(key, value);
            })
        })
        .await
    }
}
