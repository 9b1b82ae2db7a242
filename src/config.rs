//! Runtime configuration.
//!
//! Defaults, then an optional YAML file, then `QUIZ_QUEST_*` environment
//! variables. The CLI applies its own flags on top.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};

const DEFAULT_RESULTS_URL: &str = "http://127.0.0.1:8788";
const DEFAULT_GAMIFICATION_URL: &str = "http://127.0.0.1:8788";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub results_url: String,
    pub gamification_url: String,
    pub timeout_secs: u64,
    pub storage_dir: PathBuf,
    pub user_id: Option<String>,
    pub profiles_path: PathBuf,
}

/// Shape of the YAML config file; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    results_url: Option<String>,
    gamification_url: Option<String>,
    timeout_secs: Option<u64>,
    storage_dir: Option<PathBuf>,
    user_id: Option<String>,
    profiles_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = PathBuf::from(".quiz_quest");
        Self {
            results_url: DEFAULT_RESULTS_URL.to_string(),
            gamification_url: DEFAULT_GAMIFICATION_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage_dir: data_dir.join("sessions"),
            user_id: None,
            profiles_path: data_dir.join("profiles.json"),
        }
    }
}

impl Config {
    /// Defaults + optional file + process environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = file {
            config.merge_file(path)?;
        }
        config.merge_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let file: ConfigFile = serde_yaml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("config file {} loaded", path.display());

        if let Some(v) = file.results_url {
            self.results_url = v;
        }
        if let Some(v) = file.gamification_url {
            self.gamification_url = v;
        }
        if let Some(v) = file.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = file.storage_dir {
            self.storage_dir = v;
        }
        if let Some(v) = file.user_id {
            self.user_id = Some(v);
        }
        if let Some(v) = file.profiles_path {
            self.profiles_path = v;
        }
        Ok(())
    }

    /// Applies `QUIZ_QUEST_*` variables read through `lookup`. Blank values are ignored.
    pub fn merge_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("QUIZ_QUEST_RESULTS_URL") {
            self.results_url = v;
        }
        if let Some(v) = var("QUIZ_QUEST_GAMIFICATION_URL") {
            self.gamification_url = v;
        }
        if let Some(v) = var("QUIZ_QUEST_TIMEOUT_SECS") {
            match v.trim().parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => log::warn!("ignoring QUIZ_QUEST_TIMEOUT_SECS={v}: not a number"),
            }
        }
        if let Some(v) = var("QUIZ_QUEST_STORAGE_DIR") {
            self.storage_dir = PathBuf::from(v);
        }
        if let Some(v) = var("QUIZ_QUEST_USER") {
            self.user_id = Some(v);
        }
        if let Some(v) = var("QUIZ_QUEST_PROFILES") {
            self.profiles_path = PathBuf::from(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_file_and_blank_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz_quest.yaml");
        std::fs::write(
            &path,
            "results_url: http://results.local\nuser_id: from-file\ntimeout_secs: 3\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.merge_file(&path).unwrap();

        let env: HashMap<&str, &str> = [
            ("QUIZ_QUEST_USER", "from-env"),
            ("QUIZ_QUEST_RESULTS_URL", "   "),
            ("QUIZ_QUEST_TIMEOUT_SECS", "soon"),
        ]
        .into_iter()
        .collect();
        config.merge_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.results_url, "http://results.local");
        assert_eq!(config.user_id.as_deref(), Some("from-env"));
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.gamification_url, DEFAULT_GAMIFICATION_URL);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "result_url: typo\n").unwrap();

        let err = Config::default().merge_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
