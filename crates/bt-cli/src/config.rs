//! Configuration loading and management.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bt_core::{ProjectionConfig, Subject};
use bt_store::{DEFAULT_TIME_FORMAT, Store};
use chrono::{NaiveDate, NaiveDateTime};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::render::RenderStyle;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the `<Subject>_<category>.csv` exports.
    pub data_dir: PathBuf,

    /// `chrono` pattern of the `Time` column.
    pub time_format: String,

    /// Per-subject exclusive upper bound on event timestamps.
    #[serde(default)]
    pub cutoffs: BTreeMap<Subject, NaiveDateTime>,

    /// Clock-face geometry.
    #[serde(default)]
    pub projection: ProjectionConfig,

    /// Plot appearance.
    #[serde(default)]
    pub style: RenderStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            cutoffs: default_cutoffs(),
            projection: ProjectionConfig::default(),
            style: RenderStyle::default(),
        }
    }
}

fn default_cutoffs() -> BTreeMap<Subject, NaiveDateTime> {
    [
        (Subject::Lily, NaiveDate::from_ymd_opt(2022, 9, 24)),
        (Subject::Evie, NaiveDate::from_ymd_opt(2025, 7, 6)),
    ]
    .into_iter()
    .filter_map(|(subject, date)| Some((subject, date?.and_hms_opt(0, 0, 0)?)))
    .collect()
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (BT_*, nested with `__`)
        figment = figment.merge(Env::prefixed("BT_").split("__"));

        figment.extract()
    }

    /// Builds the event store for one subject, applying its cutoff.
    pub fn store(&self, subject: Subject) -> Store {
        Store::new(&self.data_dir)
            .with_time_format(self.time_format.as_str())
            .with_cutoff(self.cutoffs.get(&subject).copied())
    }
}

/// Returns the platform-specific config directory for bt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("bt"))
}
