use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::loader::{LoadOptions, SlideOrder};

/// Looked up in the working directory at startup.
pub const CONFIG_FILE_NAME: &str = "dashboard.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Startup settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub logo_path: PathBuf,
    pub max_rows: usize,
    pub max_columns: usize,
    pub slide_order: SlideOrder,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let load = LoadOptions::default();
        Self {
            data_path: PathBuf::from("data.xlsx"),
            logo_path: PathBuf::from("CMU_Logo.png"),
            max_rows: load.max_rows,
            max_columns: load.max_columns,
            slide_order: load.slide_order,
        }
    }
}

impl DashboardConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            max_rows: self.max_rows,
            max_columns: self.max_columns,
            slide_order: self.slide_order,
        }
    }
}

/// Read the config file, returning defaults if it does not exist.
pub fn load_from(path: &Path) -> Result<DashboardConfig, ConfigError> {
    if !path.exists() {
        return Ok(DashboardConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`load_from`] on [`CONFIG_FILE_NAME`], but falls back to defaults on error.
pub fn load_or_default() -> DashboardConfig {
    let path = Path::new(CONFIG_FILE_NAME);
    match load_from(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config: {e}");
            DashboardConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.load_options(), LoadOptions::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "data_path": "term.csv", "slide_order": "numeric" }"#).unwrap();

        let config = load_from(&path).unwrap();

        assert_eq!(config.data_path, PathBuf::from("term.csv"));
        assert_eq!(config.slide_order, SlideOrder::Numeric);
        assert_eq!(config.max_rows, 100);
        assert_eq!(config.logo_path, PathBuf::from("CMU_Logo.png"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "max_rows": "lots" }"#).unwrap();

        assert!(matches!(load_from(&path), Err(ConfigError::Parse { .. })));
    }
}
