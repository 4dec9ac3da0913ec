use crate::domain::chart::{DEFAULT_DATE_LABEL_FORMAT, DEFAULT_SLOPE_THRESHOLD};
use crate::domain::entry::Metric;
use anyhow::bail;
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data/entries.json")
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartSettings {
    pub date_label_format: String,
    pub slope_threshold: f64,
    pub series: Vec<SeriesConfig>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            date_label_format: DEFAULT_DATE_LABEL_FORMAT.to_string(),
            slope_threshold: DEFAULT_SLOPE_THRESHOLD,
            series: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SeriesConfig {
    pub metric: Metric,
    pub name: String,
    pub color: Option<String>,
}

impl ChartSettings {
    /// Display settings for a metric, falling back to a built-in name.
    pub fn series_for(&self, metric: Metric) -> SeriesConfig {
        self.series
            .iter()
            .find(|s| s.metric == metric)
            .cloned()
            .unwrap_or_else(|| SeriesConfig {
                metric,
                name: default_series_name(metric).to_string(),
                color: None,
            })
    }

    /// Rejects settings that would break chart rendering at request time.
    pub fn validate(&self) -> anyhow::Result<()> {
        if StrftimeItems::new(&self.date_label_format).any(|item| matches!(item, Item::Error)) {
            bail!(
                "chart.date_label_format '{}' is not a valid strftime format",
                self.date_label_format
            );
        }
        if !self.slope_threshold.is_finite() || self.slope_threshold < 0.0 {
            bail!(
                "chart.slope_threshold must be a non-negative number, got {}",
                self.slope_threshold
            );
        }
        Ok(())
    }
}

fn default_series_name(metric: Metric) -> &'static str {
    match metric {
        Metric::Weight => "Weight",
        Metric::FatPercent => "Fat %",
        Metric::MusclePercent => "Muscle %",
    }
}

/// Load `config/tracker.*`, overridden by `TRACKER__SECTION__KEY` environment variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/tracker").required(false))
        .add_source(config::Environment::with_prefix("TRACKER").separator("__"))
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.chart.validate()?;
    Ok(config)
}
