use crate::domain::timer::{DEFAULT_REST_MINUTES, DEFAULT_WORK_MINUTES};
use crate::domain::IntervalTimer;
use crate::ticker::{DEFAULT_REFRESH_MS, DEFAULT_TICK_MS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// User settings stored in config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Work interval in minutes (1-60)
    pub work_minutes: u32,
    /// Rest interval in minutes (1-30)
    pub rest_minutes: u32,
    /// Milliseconds per timer tick
    pub tick_ms: u64,
    /// Milliseconds between screen refreshes
    pub refresh_ms: u64,
    /// Send desktop notifications on phase changes and deadlines
    pub notifications: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            rest_minutes: DEFAULT_REST_MINUTES,
            tick_ms: DEFAULT_TICK_MS,
            refresh_ms: DEFAULT_REFRESH_MS,
            notifications: true,
        }
    }
}

impl AppConfig {
    /// Apply command-line overrides on top of the file values
    pub fn with_overrides(mut self, work_minutes: Option<u32>, rest_minutes: Option<u32>) -> Self {
        if let Some(work) = work_minutes {
            self.work_minutes = work;
        }
        if let Some(rest) = rest_minutes {
            self.rest_minutes = rest;
        }
        self
    }

    /// Build the interval timer, rejecting out-of-range lengths
    pub fn build_timer(&self) -> Result<IntervalTimer> {
        if self.tick_ms == 0 || self.refresh_ms == 0 {
            anyhow::bail!("tick_ms and refresh_ms must be greater than zero");
        }
        IntervalTimer::with_lengths(self.work_minutes, self.rest_minutes)
            .context("Invalid timer configuration")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Default config location: <config dir>/todo-timer/config.json
pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(dir.join("todo-timer").join("config.json"))
}

/// Load config from a JSON file; a missing file yields the defaults
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: AppConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

/// Write the default config to `path`, refusing to overwrite an existing file
pub fn init_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if path.exists() {
        anyhow::bail!("Config file already exists: {}", path.display());
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let config = AppConfig::default();
    atomic_write(path, &config.to_json()?)?;
    Ok(config)
}

/// Atomically write content to a file using temp file + rename
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    let mut temp_file = NamedTempFile::new_in(dir)
        .context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");

        let config = load_config(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.work_minutes, 25);
        assert_eq!(config.rest_minutes, 5);
    }

    #[test]
    fn test_load_partial_config() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "work_minutes": 50, "notifications": false }"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.work_minutes, 50);
        assert_eq!(config.rest_minutes, 5);
        assert!(!config.notifications);
        assert_eq!(config.tick_ms, 1000);
    }

    #[test]
    fn test_load_invalid_config() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_init_config_writes_defaults_once() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        init_config(&path).unwrap();
        assert_eq!(load_config(&path).unwrap(), AppConfig::default());

        assert!(init_config(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default().with_overrides(Some(45), None);
        assert_eq!(config.work_minutes, 45);
        assert_eq!(config.rest_minutes, 5);
    }

    #[test]
    fn test_build_timer() {
        let timer = AppConfig::default().with_overrides(Some(50), Some(10)).build_timer().unwrap();
        assert_eq!(timer.work_minutes(), 50);
        assert_eq!(timer.rest_minutes(), 10);
        assert_eq!(timer.remaining(), chrono::Duration::minutes(50));

        assert!(AppConfig::default().with_overrides(Some(90), None).build_timer().is_err());
        assert!(AppConfig::default().with_overrides(None, Some(0)).build_timer().is_err());

        let zero_tick = AppConfig {
            tick_ms: 0,
            ..AppConfig::default()
        };
        assert!(zero_tick.build_timer().is_err());
    }
}
