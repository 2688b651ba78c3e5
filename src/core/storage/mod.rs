//! Storage port - the key-value backend the scenario store writes through
//!
//! Backends store opaque strings under namespaced keys. The store owns all
//! serialization; a backend never interprets values.

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use miette::Diagnostic;
use thiserror::Error;

/// Key-value backend contract
pub trait StoragePort {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Returns `false` when the key was not present
    fn remove(&mut self, key: &str) -> Result<bool, StorageError>;

    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Write several entries; backends that can should make this atomic
    fn set_many(&mut self, entries: &[(String, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Backend read/write failure
#[derive(Debug, Error, Diagnostic)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    #[diagnostic(code(priceplan::storage::backend))]
    Backend(String),

    #[error("could not open store at {path}: {message}")]
    #[diagnostic(
        code(priceplan::storage::open),
        help("run 'priceplan init' to create a project")
    )]
    Open { path: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Backend(e.to_string())
    }
}
