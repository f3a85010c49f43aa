//! Persistence of food entries and goals.
//!
//! Storage is a flat string-to-string key-value interface. Records are
//! serialised as JSON under per-user keys by [`EntryRepository`].

mod file;
#[cfg(test)]
mod memory;
mod repository;

pub use file::JsonFileStore;
#[cfg(test)]
pub use memory::MemoryStore;
pub use repository::{EntryRepository, NewEntry};

use thiserror::Error;

/// Storage error type
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Minimal key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}
