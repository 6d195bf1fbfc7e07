//! Configuration for planstore

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub store_path: PathBuf,
}

/// Default database location, shared with the planner so both binaries
/// see the same tasks out of the box.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planstore")
        .join("tasks.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_db_path(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("planstore").join("config.yml")),
            Some(PathBuf::from("planstore.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");

        let config = Config {
            store_path: PathBuf::from("/tmp/elsewhere.db"),
        };
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.store_path, config.store_path);
    }

    #[test]
    fn missing_path_falls_back_to_defaults() {
        let loaded = Config::load(None).unwrap();
        assert!(loaded.store_path.ends_with("tasks.db"));
    }
}
