//! Goal-tracking preferences and the streak metric setting.
//!
//! The store owns the in-memory preference list for one settings session.
//! The backing store (anything implementing [`PreferenceBackend`]) is the
//! source of truth across sessions: it is read on [`GoalPreferenceStore::load`]
//! and written on every mutation, one key at a time.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::{
    Error, GoalPreference, Result, SettingsSnapshot, StatKey, StoredPreference, StreakMetric,
};

/// Persisted preference store the core reads from and writes to
///
/// Implementations own their storage format. Every call may fail; the core
/// reports failures to its caller and never retries.
#[async_trait]
pub trait PreferenceBackend: Send + Sync {
    async fn goal_preferences(&self) -> Result<Vec<StoredPreference>>;

    async fn update_goal_preference(&self, stat_name: &str, is_enabled: bool) -> Result<()>;

    async fn user_setting(&self, key: &str) -> Result<Option<String>>;

    async fn update_user_setting(&self, key: &str, value: &str) -> Result<()>;
}

/// Callback run synchronously after every successful change
pub type SettingsObserver = Box<dyn Fn(&SettingsSnapshot) + Send + Sync>;

/// In-memory view of the user's stat preferences and streak metric
pub struct GoalPreferenceStore<B> {
    backend: B,
    preferences: Vec<GoalPreference>,
    streak_metric: StreakMetric,
    loaded: bool,
    observers: Vec<SettingsObserver>,
}

impl<B: PreferenceBackend> GoalPreferenceStore<B> {
    /// Create an unloaded store; nothing is enabled until [`load`](Self::load)
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            preferences: Vec::new(),
            streak_metric: StreakMetric::default(),
            loaded: false,
            observers: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn preferences(&self) -> &[GoalPreference] {
        &self.preferences
    }

    pub fn streak_metric(&self) -> StreakMetric {
        self.streak_metric
    }

    /// Register an observer for toggles and streak metric changes
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&SettingsSnapshot) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Read preferences and the streak metric from the backing store
    ///
    /// Nothing is replaced unless both reads succeed, so a failed reload
    /// keeps whatever was loaded before. Rows naming stats outside the
    /// catalog are skipped.
    pub async fn load(&mut self) -> Result<()> {
        let stored = self.backend.goal_preferences().await.inspect_err(|e| {
            tracing::warn!("Failed to load goal preferences: {}", e);
        })?;
        let raw_metric = self
            .backend
            .user_setting(StreakMetric::SETTING_KEY)
            .await
            .inspect_err(|e| {
                tracing::warn!("Failed to load streak metric: {}", e);
            })?;

        let preferences: Vec<GoalPreference> = stored
            .into_iter()
            .filter_map(|row| match row.stat_name.parse::<StatKey>() {
                Ok(stat) => Some(GoalPreference {
                    stat,
                    is_enabled: row.is_enabled,
                }),
                Err(_) => {
                    tracing::warn!("Ignoring preference for unknown stat '{}'", row.stat_name);
                    None
                }
            })
            .collect();

        let streak_metric = match raw_metric {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring stored streak metric '{}', using default", raw);
                StreakMetric::default()
            }),
            None => StreakMetric::default(),
        };

        tracing::info!(
            "Loaded {} goal preferences, streak metric {}",
            preferences.len(),
            streak_metric
        );

        self.preferences = preferences;
        self.streak_metric = streak_metric;
        self.loaded = true;
        Ok(())
    }

    /// Enabled in the loaded list; stats without an entry count as disabled
    pub fn is_enabled(&self, stat: StatKey) -> bool {
        self.preferences
            .iter()
            .any(|p| p.stat == stat && p.is_enabled)
    }

    /// [`is_enabled`](Self::is_enabled) for a raw stat name; unknown names are disabled
    pub fn is_enabled_name(&self, stat_name: &str) -> bool {
        stat_name
            .parse::<StatKey>()
            .is_ok_and(|stat| self.is_enabled(stat))
    }

    /// Flip a stat from `current_value` and persist it
    ///
    /// The backing write happens first; only after it succeeds are matching
    /// in-memory entries updated. A stat missing from the loaded list is
    /// still written but no entry is added for it. Returns the new value.
    pub async fn toggle(&mut self, stat: StatKey, current_value: bool) -> Result<bool> {
        let new_value = !current_value;

        self.backend
            .update_goal_preference(stat.as_str(), new_value)
            .await
            .inspect_err(|e| tracing::warn!("Failed to update preference {}: {}", stat, e))?;

        let mut matched = 0;
        for pref in self.preferences.iter_mut().filter(|p| p.stat == stat) {
            pref.is_enabled = new_value;
            matched += 1;
        }
        if matched == 0 {
            tracing::debug!("Preference {} written but not present in loaded list", stat);
        }

        tracing::debug!("Toggled {} to {}", stat, new_value);
        self.notify();
        Ok(new_value)
    }

    /// Validate and persist a streak metric given by name
    ///
    /// Anything but `workouts` or `exercises` is rejected before any write.
    pub async fn set_streak_metric(&mut self, metric: &str) -> Result<()> {
        let metric: StreakMetric = metric.parse()?;
        self.select_streak_metric(metric).await
    }

    pub async fn select_streak_metric(&mut self, metric: StreakMetric) -> Result<()> {
        self.backend
            .update_user_setting(StreakMetric::SETTING_KEY, metric.as_str())
            .await
            .inspect_err(|e| tracing::warn!("Failed to save streak metric: {}", e))?;

        self.streak_metric = metric;
        tracing::debug!("Streak metric set to {}", metric);
        self.notify();
        Ok(())
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            streak_metric: self.streak_metric,
            enabled_stats: StatKey::ALL
                .into_iter()
                .filter(|s| self.is_enabled(*s))
                .collect(),
        }
    }

    fn notify(&self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer(&snapshot);
        }
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// A write that reached a [`MemoryBackend`], in call order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendWrite {
    Preference { stat_name: String, is_enabled: bool },
    Setting { key: String, value: String },
}

#[derive(Default)]
struct MemoryState {
    preferences: Vec<StoredPreference>,
    settings: HashMap<String, String>,
    writes: Vec<BackendWrite>,
}

/// Non-persistent [`PreferenceBackend`] that records writes and can be told to fail
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    /// Empty backend: no preference rows, no settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend holding a row for every stat in the catalog, all enabled
    pub fn seeded() -> Self {
        Self::with_preferences(StatKey::ALL.into_iter().map(|stat| StoredPreference {
            stat_name: stat.as_str().to_string(),
            is_enabled: true,
        }))
    }

    pub fn with_preferences(rows: impl IntoIterator<Item = StoredPreference>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                preferences: rows.into_iter().collect(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn writes(&self) -> Vec<BackendWrite> {
        self.state.lock().await.writes.clone()
    }

    pub async fn stored_preferences(&self) -> Vec<StoredPreference> {
        self.state.lock().await.preferences.clone()
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(Error::Persistence(format!("memory backend refused {}", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl PreferenceBackend for MemoryBackend {
    async fn goal_preferences(&self) -> Result<Vec<StoredPreference>> {
        self.check(&self.fail_reads, "read")?;
        Ok(self.state.lock().await.preferences.clone())
    }

    async fn update_goal_preference(&self, stat_name: &str, is_enabled: bool) -> Result<()> {
        self.check(&self.fail_writes, "write")?;
        let mut state = self.state.lock().await;
        match state.preferences.iter_mut().find(|p| p.stat_name == stat_name) {
            Some(row) => row.is_enabled = is_enabled,
            None => state.preferences.push(StoredPreference {
                stat_name: stat_name.to_string(),
                is_enabled,
            }),
        }
        state.writes.push(BackendWrite::Preference {
            stat_name: stat_name.to_string(),
            is_enabled,
        });
        Ok(())
    }

    async fn user_setting(&self, key: &str) -> Result<Option<String>> {
        self.check(&self.fail_reads, "read")?;
        Ok(self.state.lock().await.settings.get(key).cloned())
    }

    async fn update_user_setting(&self, key: &str, value: &str) -> Result<()> {
        self.check(&self.fail_writes, "write")?;
        let mut state = self.state.lock().await;
        state.settings.insert(key.to_string(), value.to_string());
        state.writes.push(BackendWrite::Setting {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }
}
