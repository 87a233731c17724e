//! Planner configuration file handling.
//!
//! The configuration lives in `planner.toml` under the platform config
//! directory. A missing file means defaults; a broken one is an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::PlannerConfig;

pub const CONFIG_FILE_NAME: &str = "planner.toml";

/// `planner.toml` in the platform config directory, if one can be resolved.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "WeekPlanner", "WeekPlanner")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Loads and validates the configuration at `path`.
pub fn load_config(path: &Path) -> Result<PlannerConfig> {
    if !path.exists() {
        log::info!(
            "No planner config at {}, using defaults",
            path.display()
        );
        return Ok(PlannerConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read planner config {}", path.display()))?;
    let config: PlannerConfig = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse planner config {}", path.display()))?;
    config
        .validate()
        .map_err(|e| anyhow!("Invalid planner config {}: {}", path.display(), e))?;

    log::debug!("loaded planner config from {}", path.display());
    Ok(config)
}

pub fn save_config(path: &Path, config: &PlannerConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow!("Refusing to save invalid planner config: {}", e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let raw = toml::to_string_pretty(config).context("Failed to serialize planner config")?;
    fs::write(path, raw)
        .with_context(|| format!("Failed to write planner config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::TimeFormat;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = PlannerConfig {
            start_hour: 7,
            end_hour: 19,
            snap_interval_minutes: 30,
            timezone: Some("Europe/Berlin".to_string()),
            secondary_timezones: vec!["Asia/Tokyo".to_string()],
            time_format: TimeFormat::TwelveHour,
            ..PlannerConfig::default()
        };

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "snap_interval_minutes = 5\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.snap_interval_minutes, 5);
        assert_eq!(config.start_hour, 6);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "start_hour = \"six\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "start_hour = 20\nend_hour = 8\n").unwrap();
        assert!(load_config(&path).is_err());

        let bad = PlannerConfig {
            timezone: Some("Mars/Olympus".to_string()),
            ..PlannerConfig::default()
        };
        assert!(save_config(&path, &bad).is_err());
    }
}
