use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use anyhow::Result;

/// How often each entry id has been launched.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct History {
    pub usage_counts: HashMap<String, u32>,
}

impl History {
    pub fn usage(&self, id: &str) -> u32 {
        self.usage_counts.get(id).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, id: &str) {
        *self.usage_counts.entry(id.to_string()).or_insert(0) += 1;
    }

    /// Keep only the `limit` most used ids.
    pub fn truncate(&mut self, limit: usize) {
        if self.usage_counts.len() <= limit {
            return;
        }
        let mut counts: Vec<(String, u32)> = self.usage_counts.drain().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(limit);
        self.usage_counts = counts.into_iter().collect();
    }
}

pub fn get_history_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "runner", "runner")
        .map(|dirs| dirs.data_dir().join("history.json"))
}

pub fn load_history() -> History {
    get_history_path()
        .map(|path| load_history_from(&path))
        .unwrap_or_default()
}

pub fn load_history_from(path: &std::path::Path) -> History {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

pub fn save_history_to(path: &std::path::Path, history: &History) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(history)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("history.json");

        let mut history = History::default();
        history.increment("firefox");
        history.increment("firefox");
        history.increment("vim");
        history.increment("ls");
        history.truncate(2);
        save_history_to(&path, &history).unwrap();

        let loaded = load_history_from(&path);
        assert_eq!(loaded.usage("firefox"), 2);
        assert_eq!(loaded.usage_counts.len(), 2);
        assert_eq!(loaded.usage("missing"), 0);
    }

    #[test]
    fn test_corrupt_history_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "not json").unwrap();
        assert!(load_history_from(&path).usage_counts.is_empty());
    }
}
