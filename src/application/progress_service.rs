// Progress service - Builds the trend chart from stored entries
use crate::application::entry_repository::{EntryRepository, StoreError};
use crate::domain::chart::{compute_chart_points, fit_metric, ProgressChart, SeriesSummary};
use crate::domain::entry::Metric;
use crate::infrastructure::config::ChartSettings;
use std::sync::Arc;

/// Which metric lines the caller wants on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleMetrics {
    pub weight: bool,
    pub fat: bool,
    pub muscle: bool,
}

impl Default for VisibleMetrics {
    fn default() -> Self {
        Self {
            weight: true,
            fat: true,
            muscle: true,
        }
    }
}

impl VisibleMetrics {
    pub fn none() -> Self {
        Self {
            weight: false,
            fat: false,
            muscle: false,
        }
    }

    pub fn is_visible(&self, metric: Metric) -> bool {
        match metric {
            Metric::Weight => self.weight,
            Metric::FatPercent => self.fat,
            Metric::MusclePercent => self.muscle,
        }
    }

    pub fn toggle(&mut self, metric: Metric) {
        match metric {
            Metric::Weight => self.weight = !self.weight,
            Metric::FatPercent => self.fat = !self.fat,
            Metric::MusclePercent => self.muscle = !self.muscle,
        }
    }

    /// Parse a comma separated list such as `weight,fat`. Blank input shows everything.
    pub fn parse(list: &str) -> Result<Self, String> {
        if list.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut visible = Self::none();
        for key in list.split(',').map(str::trim).filter(|k| !k.is_empty()) {
            let metric = Metric::from_key(key).ok_or_else(|| format!("unknown metric '{}'", key))?;
            if !visible.is_visible(metric) {
                visible.toggle(metric);
            }
        }
        Ok(visible)
    }
}

#[derive(Clone)]
pub struct ProgressService {
    repository: Arc<dyn EntryRepository>,
    chart_settings: ChartSettings,
}

impl ProgressService {
    pub fn new(repository: Arc<dyn EntryRepository>, chart_settings: ChartSettings) -> Self {
        Self {
            repository,
            chart_settings,
        }
    }

    pub async fn progress_chart(&self, visible: VisibleMetrics) -> Result<ProgressChart, StoreError> {
        let entries = self.repository.read_all().await?;
        let points = compute_chart_points(&entries, &self.chart_settings.date_label_format);

        let series: Vec<SeriesSummary> = Metric::ALL
            .into_iter()
            .filter(|m| visible.is_visible(*m))
            .map(|metric| {
                let fit = fit_metric(&entries, metric);
                let display = self.chart_settings.series_for(metric);
                SeriesSummary::new(
                    &fit,
                    display.name,
                    display.color,
                    self.chart_settings.slope_threshold,
                )
            })
            .collect();

        tracing::debug!(
            "Built progress chart: {} points, {} series",
            points.len(),
            series.len()
        );

        Ok(ProgressChart { points, series })
    }
}
