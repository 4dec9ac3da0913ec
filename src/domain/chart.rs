// Chart domain models and the entry-to-chart transformation
use crate::domain::entry::{MeasurementEntry, Metric};
use crate::domain::trendline::{fit_trend, IndexedSample, Trendline};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

pub const DEFAULT_DATE_LABEL_FORMAT: &str = "%b %d";
pub const DEFAULT_SLOPE_THRESHOLD: f64 = 0.01;

/// Raw reading plus fitted trend for one metric at one chart point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub weight: MetricValue,
    pub fat_percent: MetricValue,
    pub muscle_percent: MetricValue,
}

impl ChartPoint {
    pub fn metric(&self, metric: Metric) -> &MetricValue {
        match metric {
            Metric::Weight => &self.weight,
            Metric::FatPercent => &self.fat_percent,
            Metric::MusclePercent => &self.muscle_percent,
        }
    }

    fn metric_mut(&mut self, metric: Metric) -> &mut MetricValue {
        match metric {
            Metric::Weight => &mut self.weight,
            Metric::FatPercent => &mut self.fat_percent,
            Metric::MusclePercent => &mut self.muscle_percent,
        }
    }
}

/// Fit for one metric across the whole entry sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricFit {
    pub metric: Metric,
    pub sample_count: usize,
    pub line: Trendline,
}

impl MetricFit {
    /// A trend is only drawn with at least two samples.
    pub fn has_trend(&self) -> bool {
        self.sample_count >= 2
    }
}

/// Collects the samples of one metric, keeping each entry's rank in the
/// ascending sequence as its position even when other entries lack the metric.
pub fn metric_samples(entries: &[MeasurementEntry], metric: Metric) -> Vec<IndexedSample> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            entry
                .value_of(metric)
                .map(|value| IndexedSample::new(position, value))
        })
        .collect()
}

pub fn fit_metric(entries: &[MeasurementEntry], metric: Metric) -> MetricFit {
    let samples = metric_samples(entries, metric);
    MetricFit {
        metric,
        sample_count: samples.len(),
        line: fit_trend(&samples),
    }
}

/// Formats a date for the x axis. An unusable format falls back to ISO `YYYY-MM-DD`.
pub fn date_label(date: NaiveDate, label_format: &str) -> String {
    let mut label = String::new();
    if write!(label, "{}", date.format(label_format)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    label
}

/// Builds one chart point per entry, in input order. `entries` must be
/// ascending by entry date; positions are taken from that order.
pub fn compute_chart_points(entries: &[MeasurementEntry], label_format: &str) -> Vec<ChartPoint> {
    let fits = Metric::ALL.map(|metric| fit_metric(entries, metric));

    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let mut point = ChartPoint {
                label: date_label(entry.entry_date, label_format),
                weight: MetricValue::default(),
                fat_percent: MetricValue::default(),
                muscle_percent: MetricValue::default(),
            };

            for fit in &fits {
                let slot = point.metric_mut(fit.metric);
                slot.value = entry.value_of(fit.metric);
                if fit.has_trend() {
                    slot.trend = Some(fit.line.value_at(position));
                    slot.slope = Some(fit.line.slope);
                }
            }

            point
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Flat,
}

impl TrendDirection {
    /// Slopes within `threshold` of zero count as flat.
    pub fn from_slope(slope: f64, threshold: f64) -> Self {
        if slope > threshold {
            TrendDirection::Rising
        } else if slope < -threshold {
            TrendDirection::Falling
        } else {
            TrendDirection::Flat
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Left,
    Right,
}

impl Axis {
    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::Weight => Axis::Left,
            Metric::FatPercent | Metric::MusclePercent => Axis::Right,
        }
    }
}

/// Descriptor of one metric's line on the progress chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub metric: Metric,
    pub name: String,
    pub color: Option<String>,
    pub axis: Axis,
    pub sample_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercept: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<TrendDirection>,
}

impl SeriesSummary {
    pub fn new(fit: &MetricFit, name: String, color: Option<String>, slope_threshold: f64) -> Self {
        let trend = fit.has_trend().then_some(fit.line);
        Self {
            metric: fit.metric,
            name,
            color,
            axis: Axis::for_metric(fit.metric),
            sample_count: fit.sample_count,
            slope: trend.map(|t| t.slope),
            intercept: trend.map(|t| t.intercept),
            direction: trend.map(|t| TrendDirection::from_slope(t.slope, slope_threshold)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressChart {
    pub points: Vec<ChartPoint>,
    pub series: Vec<SeriesSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::tests::entry;

    fn four_entries_sparse_fat() -> Vec<MeasurementEntry> {
        let mut entries = vec![
            entry("a", (2024, 1, 1), 80.0),
            entry("b", (2024, 1, 8), 79.0),
            entry("c", (2024, 1, 15), 78.0),
            entry("d", (2024, 1, 22), 77.0),
        ];
        entries[0].fat_percent = Some(25.0);
        entries[3].fat_percent = Some(22.0);
        entries
    }

    #[test]
    fn test_empty_entries() {
        assert!(compute_chart_points(&[], DEFAULT_DATE_LABEL_FORMAT).is_empty());
    }

    #[test]
    fn test_single_entry_has_no_trend() {
        let mut only = entry("a", (2024, 5, 9), 70.0);
        only.fat_percent = Some(18.0);
        only.muscle_percent = Some(40.0);

        let points = compute_chart_points(&[only], DEFAULT_DATE_LABEL_FORMAT);
        assert_eq!(points.len(), 1);
        for metric in Metric::ALL {
            let value = points[0].metric(metric);
            assert!(value.value.is_some());
            assert_eq!(value.trend, None);
            assert_eq!(value.slope, None);
        }
    }

    #[test]
    fn test_sparse_metric_keeps_positions() {
        let entries = four_entries_sparse_fat();
        let points = compute_chart_points(&entries, DEFAULT_DATE_LABEL_FORMAT);

        assert_eq!(points.len(), 4);
        // Fat fitted only through positions 0 and 3: 25 -> 22, slope -1.
        let expected_fat = [25.0, 24.0, 23.0, 22.0];
        for (point, expected) in points.iter().zip(expected_fat) {
            assert_eq!(point.fat_percent.slope, Some(-1.0));
            assert_eq!(point.fat_percent.trend, Some(expected));
            assert_eq!(point.weight.slope, Some(-1.0));
        }
        assert_eq!(points[1].fat_percent.value, None);
        assert_eq!(points[2].fat_percent.value, None);
        assert_eq!(points[3].weight.trend, Some(77.0));
        // No muscle readings at all.
        assert!(points.iter().all(|p| p.muscle_percent == MetricValue::default()));
    }

    #[test]
    fn test_labels_and_order_follow_input() {
        let entries = four_entries_sparse_fat();
        let labels: Vec<String> = compute_chart_points(&entries, DEFAULT_DATE_LABEL_FORMAT)
            .into_iter()
            .map(|p| p.label)
            .collect();
        assert_eq!(labels, vec!["Jan 01", "Jan 08", "Jan 15", "Jan 22"]);

        let iso: Vec<String> = compute_chart_points(&entries[..2], "%Y-%m-%d")
            .into_iter()
            .map(|p| p.label)
            .collect();
        assert_eq!(iso, vec!["2024-01-01", "2024-01-08"]);
    }

    #[test]
    fn test_bad_label_format_falls_back_to_iso() {
        let points = compute_chart_points(&[entry("a", (2024, 1, 1), 70.0)], "%Q");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, "2024-01-01");
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let entries = four_entries_sparse_fat();
        assert_eq!(
            compute_chart_points(&entries, DEFAULT_DATE_LABEL_FORMAT),
            compute_chart_points(&entries, DEFAULT_DATE_LABEL_FORMAT)
        );
    }

    #[test]
    fn test_flat_weight_trend() {
        let entries = vec![
            entry("a", (2024, 1, 1), 75.0),
            entry("b", (2024, 1, 2), 75.0),
            entry("c", (2024, 1, 3), 75.0),
        ];
        let points = compute_chart_points(&entries, DEFAULT_DATE_LABEL_FORMAT);
        assert!(points.iter().all(|p| p.weight.trend == Some(75.0)));
        assert!(points.iter().all(|p| p.weight.slope == Some(0.0)));
    }

    #[test]
    fn test_trend_direction() {
        assert_eq!(TrendDirection::from_slope(0.5, 0.01), TrendDirection::Rising);
        assert_eq!(TrendDirection::from_slope(-0.02, 0.01), TrendDirection::Falling);
        assert_eq!(TrendDirection::from_slope(0.01, 0.01), TrendDirection::Flat);
        assert_eq!(TrendDirection::from_slope(-0.005, 0.01), TrendDirection::Flat);
    }

    #[test]
    fn test_series_summary() {
        let entries = four_entries_sparse_fat();
        let fat = SeriesSummary::new(
            &fit_metric(&entries, Metric::FatPercent),
            "Fat %".to_string(),
            None,
            DEFAULT_SLOPE_THRESHOLD,
        );
        assert_eq!(fat.axis, Axis::Right);
        assert_eq!(fat.sample_count, 2);
        assert_eq!(fat.direction, Some(TrendDirection::Falling));

        let muscle = SeriesSummary::new(
            &fit_metric(&entries, Metric::MusclePercent),
            "Muscle %".to_string(),
            None,
            DEFAULT_SLOPE_THRESHOLD,
        );
        assert_eq!(muscle.sample_count, 0);
        assert_eq!(muscle.slope, None);
        assert_eq!(muscle.direction, None);
    }

    #[test]
    fn test_point_serialization_omits_missing_trend() {
        let points = compute_chart_points(&[entry("a", (2024, 1, 1), 70.0)], "%b %d");
        let json = serde_json::to_value(&points[0]).unwrap();
        assert_eq!(json["label"], "Jan 01");
        assert_eq!(json["weight"]["value"], 70.0);
        assert!(json["weight"].get("trend").is_none());
        assert!(json["fatPercent"]["value"].is_null());
    }
}
