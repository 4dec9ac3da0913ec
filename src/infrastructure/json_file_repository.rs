// JSON file entry store
use crate::application::entry_repository::{
    apply_create, apply_delete, apply_update, EntryRepository, StoreError,
};
use crate::domain::entry::{sort_by_entry_date, MeasurementEntry};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Stores all entries as one JSON array, rewritten on every mutation.
///
/// Records keep the browser-storage field names (`date`, `updatedAt`,
/// `currentWeight`, ...), so exported data can be dropped in as-is.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedEntry {
    id: String,
    #[serde(deserialize_with = "deserialize_entry_date", serialize_with = "serialize_entry_date")]
    date: NaiveDate,
    // Older records predate the modification timestamp.
    #[serde(default, deserialize_with = "deserialize_updated_at")]
    updated_at: Option<DateTime<Utc>>,
    current_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fat_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    muscle_percentage: Option<f64>,
}

impl From<PersistedEntry> for MeasurementEntry {
    fn from(record: PersistedEntry) -> Self {
        let last_modified = record
            .updated_at
            .unwrap_or_else(|| record.date.and_time(NaiveTime::MIN).and_utc());
        MeasurementEntry {
            id: record.id,
            entry_date: record.date,
            last_modified,
            weight: record.current_weight,
            fat_percent: record.fat_percentage,
            muscle_percent: record.muscle_percentage,
        }
    }
}

impl From<&MeasurementEntry> for PersistedEntry {
    fn from(entry: &MeasurementEntry) -> Self {
        PersistedEntry {
            id: entry.id.clone(),
            date: entry.entry_date,
            updated_at: Some(entry.last_modified),
            current_weight: entry.weight,
            fat_percentage: entry.fat_percent,
            muscle_percentage: entry.muscle_percent,
        }
    }
}

/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp.
fn deserialize_entry_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|e| serde::de::Error::custom(format!("invalid entry date '{}': {}", raw, e)))
}

/// Missing, null and blank timestamps all read as absent.
fn deserialize_updated_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| serde::de::Error::custom(format!("invalid updatedAt '{}': {}", value, e))),
    }
}

fn serialize_entry_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let midnight = date.and_time(NaiveTime::MIN).and_utc();
    serializer.serialize_str(&midnight.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<MeasurementEntry>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No entry file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let records: Vec<PersistedEntry> = serde_json::from_slice(&bytes)?;
        Ok(records.into_iter().map(MeasurementEntry::from).collect())
    }

    /// Writes the sorted collection to a sibling temp file, then renames it over the target.
    async fn save(&self, entries: &[MeasurementEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let records: Vec<PersistedEntry> = entries.iter().map(PersistedEntry::from).collect();
        let json = serde_json::to_vec_pretty(&records)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!("Wrote {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    async fn mutate<F>(&self, change: F) -> Result<Vec<MeasurementEntry>, StoreError>
    where
        F: FnOnce(&mut Vec<MeasurementEntry>) -> Result<(), StoreError> + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        change(&mut entries)?;

        let sorted = sort_by_entry_date(&entries);
        if let Err(e) = self.save(&sorted).await {
            tracing::error!("Failed to persist entries to {}: {}", self.path.display(), e);
            return Err(e);
        }
        Ok(sorted)
    }
}

#[async_trait]
impl EntryRepository for JsonFileRepository {
    async fn read_all(&self) -> Result<Vec<MeasurementEntry>, StoreError> {
        let entries = self.load().await?;
        Ok(sort_by_entry_date(&entries))
    }

    async fn create(&self, entry: MeasurementEntry) -> Result<Vec<MeasurementEntry>, StoreError> {
        self.mutate(|entries| apply_create(entries, entry)).await
    }

    async fn update(&self, entry: MeasurementEntry) -> Result<Vec<MeasurementEntry>, StoreError> {
        self.mutate(|entries| apply_update(entries, entry)).await
    }

    async fn delete(&self, id: &str) -> Result<Vec<MeasurementEntry>, StoreError> {
        self.mutate(|entries| apply_delete(entries, id)).await
    }
}
