// Application layer - Use cases over the entry store
pub mod entry_repository;
pub mod entry_service;
pub mod progress_service;
