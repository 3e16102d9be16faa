//! CLI configuration loaded from the user's config directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

const CONFIG_DIR: &str = "kanfile";
const CONFIG_FILE: &str = "config.toml";
const DATA_FILE: &str = "tasks.json";

/// Configuration loaded from `config.toml` under the user's config
/// directory. A missing file yields the defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Path of the JSON document holding the board.
    #[serde(default)]
    pub data_path: Option<PathBuf>,
    /// Horizon in days for the due-soon bucket.
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: i64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            due_soon_days: default_due_soon_days(),
        }
    }
}

const fn default_due_soon_days() -> i64 {
    3
}

impl BoardConfig {
    /// Load configuration from the user's config directory.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(Self::default());
        };
        Self::from_path(&config_dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from a known file path.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read, parsed, or
    /// validated.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.due_soon_days < 1 {
            bail!("due_soon_days must be at least 1");
        }
        Ok(())
    }

    /// Resolve the board document path: CLI override first, then the
    /// configured path, then the default under the user's data directory.
    ///
    /// # Errors
    /// Returns an error when no data directory can be resolved.
    pub fn resolve_data_path(&self, override_path: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path);
        }
        if let Some(path) = &self.data_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir().context("failed to resolve a data directory for the board")?;
        Ok(data_dir.join(CONFIG_DIR).join(DATA_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, contents).unwrap_or_else(|err| panic!("must write config: {err}"));
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap_or_else(|err| panic!("must create temp dir: {err}"));
        let config = BoardConfig::from_path(&dir.path().join("absent.toml"))
            .unwrap_or_else(|err| panic!("must load: {err}"));
        assert!(config.data_path.is_none());
        assert_eq!(config.due_soon_days, 3);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = TempDir::new().unwrap_or_else(|err| panic!("must create temp dir: {err}"));
        let path = write_config(&dir, "data_path = \"/tmp/board.json\"\ndue_soon_days = 7\n");
        let config = BoardConfig::from_path(&path).unwrap_or_else(|err| panic!("must load: {err}"));
        assert_eq!(config.data_path.as_deref(), Some(Path::new("/tmp/board.json")));
        assert_eq!(config.due_soon_days, 7);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let dir = TempDir::new().unwrap_or_else(|err| panic!("must create temp dir: {err}"));
        let path = write_config(&dir, "due_soon_days = 0\n");
        assert!(BoardConfig::from_path(&path).is_err());
    }

    #[test]
    fn override_path_wins_over_config() {
        let config = BoardConfig {
            data_path: Some(PathBuf::from("/configured.json")),
            due_soon_days: 3,
        };
        let resolved = config
            .resolve_data_path(Some(PathBuf::from("/override.json")))
            .unwrap_or_else(|err| panic!("must resolve: {err}"));
        assert_eq!(resolved, PathBuf::from("/override.json"));

        let resolved = config
            .resolve_data_path(None)
            .unwrap_or_else(|err| panic!("must resolve: {err}"));
        assert_eq!(resolved, PathBuf::from("/configured.json"));
    }
}
