// Entry service - Use cases for logging, editing and listing measurements
use crate::application::entry_repository::{EntryRepository, StoreError};
use crate::domain::entry::{
    sort_entries, EntryDraft, EntryError, MeasurementEntry, SortOrder,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;

const ID_SUFFIX_LEN: usize = 7;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Invalid(#[from] EntryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Source of the current time, swapped out in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone)]
pub struct EntryService {
    repository: Arc<dyn EntryRepository>,
    clock: Arc<dyn Clock>,
}

impl EntryService {
    pub fn new(repository: Arc<dyn EntryRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn list_entries(&self, order: SortOrder) -> Result<Vec<MeasurementEntry>, ServiceError> {
        let entries = self.repository.read_all().await?;
        Ok(sort_entries(&entries, order))
    }

    pub async fn add_entry(&self, draft: EntryDraft) -> Result<Vec<MeasurementEntry>, ServiceError> {
        draft.validate(self.clock.today())?;

        let id = generate_entry_id(draft.entry_date);
        let entry = MeasurementEntry::from_draft(id, draft, self.clock.now());
        tracing::debug!("Creating entry {} for {}", entry.id, entry.entry_date);

        Ok(self.repository.create(entry).await?)
    }

    pub async fn update_entry(
        &self,
        id: &str,
        draft: EntryDraft,
    ) -> Result<Vec<MeasurementEntry>, ServiceError> {
        draft.validate(self.clock.today())?;

        // the store advances this past the previous value if the clock has stalled
        let last_modified = self.clock.now();
        let entry = MeasurementEntry::from_draft(id.to_string(), draft, last_modified);
        tracing::debug!("Updating entry {}", id);

        Ok(self.repository.update(entry).await?)
    }

    pub async fn delete_entry(&self, id: &str) -> Result<Vec<MeasurementEntry>, ServiceError> {
        tracing::debug!("Deleting entry {}", id);
        Ok(self.repository.delete(id).await?)
    }
}

/// Entry ids read as `<entry date>-<short random suffix>`.
pub fn generate_entry_id(entry_date: NaiveDate) -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(ID_SUFFIX_LEN)
        .collect();
    format!("{}-{}", entry_date.format("%Y-%m-%d"), suffix)
}
