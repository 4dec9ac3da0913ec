// Application state for HTTP handlers
use crate::application::entry_service::EntryService;
use crate::application::progress_service::ProgressService;

#[derive(Clone)]
pub struct AppState {
    pub entry_service: EntryService,
    pub progress_service: ProgressService,
}
