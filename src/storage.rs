use crate::errors::AppError;
use crate::models::{Dashboard, HistoryLog, StepCounterState};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{error, warn};

pub const KEY_CURRENT_STEPS: &str = "currentSteps";
pub const KEY_ACTIVE_SECONDS: &str = "activeSeconds";
pub const KEY_STEP_GOAL: &str = "stepGoal";
pub const KEY_DARK_MODE: &str = "darkMode";
pub const KEY_STEP_HISTORY: &str = "stepHistory";

/// String-keyed, string-valued store persisted as one JSON object.
/// Without a path it lives in memory only.
#[derive(Debug, Clone, Default)]
pub struct KeyValueStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl KeyValueStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub async fn open(path: &Path) -> Self {
        let entries = match fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    error!("failed to parse data file: {err}");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                error!("failed to read data file: {err}");
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path.to_path_buf()),
            entries,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub async fn persist(&self) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let payload = serde_json::to_vec_pretty(&self.entries).map_err(AppError::internal)?;
        fs::write(path, payload).await?;
        Ok(())
    }

    /// Rebuilds the dashboard from stored keys. Missing or malformed values
    /// fall back to defaults.
    pub fn load_dashboard(&self, default_goal: u64) -> Dashboard {
        let mut dashboard = Dashboard::with_goal(default_goal);
        dashboard.counter = StepCounterState {
            step_count: self.read_parsed(KEY_CURRENT_STEPS).unwrap_or(0),
            active_seconds: self.read_parsed(KEY_ACTIVE_SECONDS).unwrap_or(0),
            last_step_at_ms: None,
        };
        dashboard.goal = self
            .read_parsed::<u64>(KEY_STEP_GOAL)
            .filter(|goal| *goal > 0)
            .unwrap_or(default_goal);
        dashboard.dark_mode = self.get(KEY_DARK_MODE) == Some("true");
        dashboard.history = self.read_history();
        dashboard
    }

    pub fn write_counter(&mut self, counter: &StepCounterState) {
        self.set(KEY_CURRENT_STEPS, counter.step_count.to_string());
        self.set(KEY_ACTIVE_SECONDS, counter.active_seconds.to_string());
    }

    pub fn write_goal(&mut self, goal: u64) {
        self.set(KEY_STEP_GOAL, goal.to_string());
    }

    pub fn write_dark_mode(&mut self, enabled: bool) {
        self.set(KEY_DARK_MODE, enabled.to_string());
    }

    pub fn write_history(&mut self, history: &HistoryLog) {
        match serde_json::to_string(history) {
            Ok(raw) => self.set(KEY_STEP_HISTORY, raw),
            Err(err) => error!("failed to serialize step history: {err}"),
        }
    }

    fn read_parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring malformed {key}={raw:?}");
                None
            }
        }
    }

    fn read_history(&self) -> HistoryLog {
        let Some(raw) = self.get(KEY_STEP_HISTORY) else {
            return Vec::new();
        };
        serde_json::from_str(raw).unwrap_or_else(|err| {
            warn!("ignoring malformed {KEY_STEP_HISTORY}: {err}");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HistoryEntry;

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("step_counter_{tag}_{}_{}.json", std::process::id(), nanos));
        path
    }

    #[test]
    fn empty_store_yields_defaults() {
        let dashboard = KeyValueStore::in_memory().load_dashboard(1000);
        assert_eq!(dashboard, Dashboard::with_goal(1000));
    }

    #[test]
    fn malformed_values_fall_back() {
        let mut store = KeyValueStore::in_memory();
        store.set(KEY_CURRENT_STEPS, "lots");
        store.set(KEY_ACTIVE_SECONDS, "-4");
        store.set(KEY_STEP_GOAL, "0");
        store.set(KEY_DARK_MODE, "yes");
        store.set(KEY_STEP_HISTORY, "{not json");

        let dashboard = store.load_dashboard(1000);
        assert_eq!(dashboard.counter.step_count, 0);
        assert_eq!(dashboard.counter.active_seconds, 0);
        assert_eq!(dashboard.goal, 1000);
        assert!(!dashboard.dark_mode);
        assert!(dashboard.history.is_empty());
    }

    #[tokio::test]
    async fn dashboard_survives_reopen() {
        let path = temp_path("reopen");
        let history = vec![
            HistoryEntry { date: "2026-10-15".into(), steps: 4210 },
            HistoryEntry { date: "2026-10-14".into(), steps: 0 },
            HistoryEntry { date: "2026-10-13".into(), steps: 12050 },
        ];

        let mut store = KeyValueStore::open(&path).await;
        store.write_counter(&StepCounterState {
            step_count: 321,
            active_seconds: 47,
            last_step_at_ms: Some(99),
        });
        store.write_goal(8000);
        store.write_dark_mode(true);
        store.write_history(&history);
        store.persist().await.unwrap();

        let reopened = KeyValueStore::open(&path).await.load_dashboard(1000);
        assert_eq!(reopened.counter.step_count, 321);
        assert_eq!(reopened.counter.active_seconds, 47);
        assert_eq!(reopened.counter.last_step_at_ms, None);
        assert_eq!(reopened.goal, 8000);
        assert!(reopened.dark_mode);
        assert_eq!(reopened.history, history);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn corrupt_file_opens_empty() {
        let path = temp_path("corrupt");
        std::fs::write(&path, b"[1, 2").unwrap();
        let store = KeyValueStore::open(&path).await;
        assert_eq!(store.get(KEY_CURRENT_STEPS), None);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn values_are_stored_as_strings() {
        let mut store = KeyValueStore::in_memory();
        store.write_dark_mode(false);
        store.write_goal(1500);
        assert_eq!(store.get(KEY_DARK_MODE), Some("false"));
        assert_eq!(store.get(KEY_STEP_GOAL), Some("1500"));
    }
}
