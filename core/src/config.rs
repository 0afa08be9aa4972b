use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::holiday::Region;
use crate::model::window::DateWindow;
use crate::repository::{FileSource, HttpSource, SnapshotSource};
use crate::time::today;

pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/koustubh25/station-station/main/output/attendance.json";

const CONFIG_DIR_NAME: &str = ".attendance";
const CONFIG_FILE_NAME: &str = "config.json";

/// Explicit configuration handed to the components that need it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub data_url: String,
    /// Read this local snapshot instead of the published URL.
    pub snapshot_file: Option<PathBuf>,
    pub default_start: NaiveDate,
    /// `None` means "today".
    pub default_end: Option<NaiveDate>,
    pub region: Region,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            snapshot_file: None,
            // Financial year start
            default_start: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap_or_default(),
            default_end: None,
            region: Region::default(),
        }
    }
}

impl AppConfig {
    /// `~/.attendance/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(home_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads `path`, or the default location when `None`. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Ok(p) => p,
                Err(_) => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn default_window(&self) -> DateWindow {
        DateWindow::new(self.default_start, self.default_end.unwrap_or_else(today))
    }

    /// The local snapshot when configured, otherwise the published URL.
    pub fn snapshot_source(&self) -> Box<dyn SnapshotSource + Send + Sync> {
        match &self.snapshot_file {
            Some(path) => Box::new(FileSource::new(path.clone())),
            None => Box::new(HttpSource::new(self.data_url.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("config.json"))).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.region, Region::AuVic);
        assert_eq!(config.default_start, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
    }

    #[test]
    fn test_partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"snapshotFile": "/tmp/attendance.json", "defaultEnd": "2025-12-31", "region": "AU-VIC"}"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data_url, DEFAULT_DATA_URL);
        assert_eq!(config.snapshot_file, Some(PathBuf::from("/tmp/attendance.json")));

        let window = config.default_window();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(config.snapshot_source().describe(), "/tmp/attendance.json");
    }

    #[test]
    fn test_region_aliases_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        for token in ["VIC", "AU_VIC", "AU-VIC"] {
            fs::write(&path, format!(r#"{{"region": "{}"}}"#, token)).unwrap();
            assert_eq!(AppConfig::load(Some(&path)).unwrap().region, Region::AuVic);
            assert_eq!(token.parse::<Region>().unwrap(), Region::AuVic);
        }
    }

    #[test]
    fn test_unknown_region_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"region": "NZ"}"#).unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }
}
