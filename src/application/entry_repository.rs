// Repository trait for measurement entry storage
use crate::domain::entry::MeasurementEntry;
use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no entry with id {0}")]
    NotFound(String),
    #[error("entry {0} already exists")]
    Duplicate(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored entries are malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Every operation returns the resulting collection ordered by entry date ascending.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn read_all(&self) -> Result<Vec<MeasurementEntry>, StoreError>;

    /// Store a new entry. Fails if its id is already taken.
    async fn create(&self, entry: MeasurementEntry) -> Result<Vec<MeasurementEntry>, StoreError>;

    /// Replace the entry with the same id. The stored `last_modified` is
    /// advanced past the previous one even when the caller's clock is not.
    async fn update(&self, entry: MeasurementEntry) -> Result<Vec<MeasurementEntry>, StoreError>;

    async fn delete(&self, id: &str) -> Result<Vec<MeasurementEntry>, StoreError>;
}

/// Shared list mutations, applied by each backend under its own lock.
pub(crate) fn apply_create(
    entries: &mut Vec<MeasurementEntry>,
    entry: MeasurementEntry,
) -> Result<(), StoreError> {
    if entries.iter().any(|e| e.id == entry.id) {
        return Err(StoreError::Duplicate(entry.id));
    }
    entries.push(entry);
    Ok(())
}

pub(crate) fn apply_update(
    entries: &mut [MeasurementEntry],
    mut entry: MeasurementEntry,
) -> Result<(), StoreError> {
    match entries.iter_mut().find(|e| e.id == entry.id) {
        Some(slot) => {
            if entry.last_modified <= slot.last_modified {
                entry.last_modified = slot.last_modified + Duration::milliseconds(1);
            }
            *slot = entry;
            Ok(())
        }
        None => Err(StoreError::NotFound(entry.id)),
    }
}

pub(crate) fn apply_delete(entries: &mut Vec<MeasurementEntry>, id: &str) -> Result<(), StoreError> {
    let before = entries.len();
    entries.retain(|e| e.id != id);
    if entries.len() == before {
        return Err(StoreError::NotFound(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::tests::entry;

    #[test]
    fn test_update_never_moves_timestamp_back() {
        let stored = entry("a", (2024, 1, 2), 80.0);
        let mut entries = vec![stored.clone()];

        let mut stale = stored.clone();
        stale.last_modified = stored.last_modified - Duration::hours(1);
        apply_update(&mut entries, stale).unwrap();
        assert_eq!(
            entries[0].last_modified,
            stored.last_modified + Duration::milliseconds(1)
        );

        let mut fresh = stored.clone();
        fresh.last_modified = stored.last_modified + Duration::hours(2);
        apply_update(&mut entries, fresh.clone()).unwrap();
        assert_eq!(entries[0].last_modified, fresh.last_modified);
    }
}
