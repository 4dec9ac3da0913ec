// In-memory entry store, used for tests and ephemeral runs
use crate::application::entry_repository::{
    apply_create, apply_delete, apply_update, EntryRepository, StoreError,
};
use crate::domain::entry::{sort_by_entry_date, MeasurementEntry};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: RwLock<Vec<MeasurementEntry>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<MeasurementEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl EntryRepository for MemoryRepository {
    async fn read_all(&self) -> Result<Vec<MeasurementEntry>, StoreError> {
        let entries = self.entries.read().await;
        Ok(sort_by_entry_date(&entries))
    }

    async fn create(&self, entry: MeasurementEntry) -> Result<Vec<MeasurementEntry>, StoreError> {
        let mut entries = self.entries.write().await;
        apply_create(&mut entries, entry)?;
        Ok(sort_by_entry_date(&entries))
    }

    async fn update(&self, entry: MeasurementEntry) -> Result<Vec<MeasurementEntry>, StoreError> {
        let mut entries = self.entries.write().await;
        apply_update(&mut entries, entry)?;
        Ok(sort_by_entry_date(&entries))
    }

    async fn delete(&self, id: &str) -> Result<Vec<MeasurementEntry>, StoreError> {
        let mut entries = self.entries.write().await;
        apply_delete(&mut entries, id)?;
        Ok(sort_by_entry_date(&entries))
    }
}
