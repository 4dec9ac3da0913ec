// Measurement entry domain model
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_PERCENT: f64 = 0.0;
const MAX_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementEntry {
    pub id: String,
    pub entry_date: NaiveDate,
    pub last_modified: DateTime<Utc>,
    pub weight: f64,
    pub fat_percent: Option<f64>,
    pub muscle_percent: Option<f64>,
}

impl MeasurementEntry {
    pub fn from_draft(id: String, draft: EntryDraft, last_modified: DateTime<Utc>) -> Self {
        Self {
            id,
            entry_date: draft.entry_date,
            last_modified,
            weight: draft.weight,
            fat_percent: draft.fat_percent,
            muscle_percent: draft.muscle_percent,
        }
    }

    pub fn value_of(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Weight => Some(self.weight),
            Metric::FatPercent => self.fat_percent,
            Metric::MusclePercent => self.muscle_percent,
        }
    }
}

/// User supplied fields of an entry, before the store assigns an id and timestamp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub entry_date: NaiveDate,
    pub weight: f64,
    #[serde(default)]
    pub fat_percent: Option<f64>,
    #[serde(default)]
    pub muscle_percent: Option<f64>,
}

impl EntryDraft {
    /// Checks the draft against the entry invariants. `today` bounds the entry date.
    pub fn validate(&self, today: NaiveDate) -> Result<(), EntryError> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(EntryError::NonPositiveWeight(self.weight));
        }
        check_percent("fatPercent", self.fat_percent)?;
        check_percent("musclePercent", self.muscle_percent)?;

        if self.entry_date > today {
            return Err(EntryError::FutureDate(self.entry_date));
        }
        if self.entry_date < earliest_entry_date() {
            return Err(EntryError::DateTooEarly(self.entry_date));
        }
        Ok(())
    }
}

fn check_percent(field: &'static str, value: Option<f64>) -> Result<(), EntryError> {
    match value {
        Some(v) if !v.is_finite() || !(MIN_PERCENT..=MAX_PERCENT).contains(&v) => {
            Err(EntryError::PercentOutOfRange { field, value: v })
        }
        _ => Ok(()),
    }
}

fn earliest_entry_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Error, PartialEq)]
pub enum EntryError {
    #[error("weight must be positive, got {0}")]
    NonPositiveWeight(f64),
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },
    #[error("entry date {0} is in the future")]
    FutureDate(NaiveDate),
    #[error("entry date {0} is before 1900-01-01")]
    DateTooEarly(NaiveDate),
}

/// The three tracked metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "weight")]
    Weight,
    #[serde(rename = "fat")]
    FatPercent,
    #[serde(rename = "muscle")]
    MusclePercent,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Weight, Metric::FatPercent, Metric::MusclePercent];

    pub fn key(&self) -> &'static str {
        match self {
            Metric::Weight => "weight",
            Metric::FatPercent => "fat",
            Metric::MusclePercent => "muscle",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Returns a new vector ordered by entry date ascending. Stable, so entries
/// sharing a date keep their relative order.
pub fn sort_by_entry_date(entries: &[MeasurementEntry]) -> Vec<MeasurementEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| e.entry_date);
    sorted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// Orders entries for the table view. Input is expected ascending by entry date.
pub fn sort_entries(entries: &[MeasurementEntry], order: SortOrder) -> Vec<MeasurementEntry> {
    let mut sorted = match order.key {
        SortKey::Date => sort_by_entry_date(entries),
        SortKey::Updated => {
            let mut by_update = entries.to_vec();
            by_update.sort_by_key(|e| e.last_modified);
            by_update
        }
    };
    if order.direction == SortDirection::Desc {
        sorted.reverse();
    }
    sorted
}
