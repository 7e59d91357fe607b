use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::EmptySelectionPolicy;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "GAMES_DASHBOARD_CONFIG";

/// Games released before this year are dropped during cleaning.
pub const DEFAULT_YEAR_THRESHOLD: i64 = 2000;

/// Startup settings of the dashboard.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset loaded at startup. Without one, use File → Open.
    pub data_path: Option<PathBuf>,
    pub year_threshold: i64,
    pub empty_selection: EmptySelectionPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            year_threshold: DEFAULT_YEAR_THRESHOLD,
            empty_selection: EmptySelectionPolicy::default(),
        }
    }
}

impl DashboardConfig {
    /// Defaults, then the file named by [`CONFIG_ENV_VAR`], then the first
    /// command-line argument as the data path.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(path) = std::env::args_os().nth(1) {
            config.data_path = Some(PathBuf::from(path));
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
