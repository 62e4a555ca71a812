//! Run settings of the command line tool.
//!
//! Settings are read from a YAML file and may be overridden by `NATURAL_SORT_` prefixed
//! environment variables, e.g. `NATURAL_SORT_BATCH_SIZE=5000`.
//!
//! ```yaml
//! input_file_path: ./input.txt
//! output_file_path: ./output.txt
//! store_path: ./staging
//! batch_size: 10000
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;

use crate::sort::NaturalSort;

/// Default settings file name
pub const DEFAULT_SETTINGS_PATH: &str = "config.yml";

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub input_file_path: PathBuf,
    pub output_file_path: PathBuf,
    /// Staging store location, a fresh temporary directory when neither this nor
    /// `database_path` is set
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    /// Older name of `store_path`, used only when `store_path` is not set
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    pub batch_size: usize,
    /// Defaults to `batch_size`
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub max_runs: Option<usize>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Settings sources for `path`, lowest precedence first. Callers may merge further overrides.
    pub fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("NATURAL_SORT_"))
    }

    pub fn load(path: &Path) -> Result<Settings, anyhow::Error> {
        Self::extract(Self::figment(path))
            .with_context(|| format!("settings: {}", path.to_string_lossy()))
    }

    pub fn extract(figment: Figment) -> Result<Settings, anyhow::Error> {
        let settings: Settings = figment.extract()?;
        Ok(settings)
    }

    pub fn store_path(&self) -> Option<&PathBuf> {
        self.store_path.as_ref().or(self.database_path.as_ref())
    }

    /// Create the [NaturalSort] described by these settings
    pub fn natural_sort(&self) -> NaturalSort {
        let mut natural_sort = NaturalSort::new(self.input_file_path.clone(), self.output_file_path.clone());
        if let Some(store_path) = self.store_path() {
            natural_sort.with_store_dir(store_path.clone());
        }
        natural_sort.with_batch_size(self.batch_size);
        if let Some(page_size) = self.page_size {
            natural_sort.with_page_size(page_size);
        }
        if let Some(max_runs) = self.max_runs {
            natural_sort.with_max_runs(max_runs);
        }
        natural_sort
    }
}
