//! Durable key/value storage.
//!
//! The progress map and the last-used folder name are persisted through the
//! `KeyValueStore` trait. `FileStore` keeps every key in one JSON document on
//! disk; `MemoryStore` is used when no durable location is available and in
//! tests.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Storage key holding the serialized progress map.
pub const PROGRESS_KEY: &str = "lectureProgress";
/// Storage key holding the display name of the last selected folder.
pub const FOLDER_NAME_KEY: &str = "selectedFolderName";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A minimal string-to-string store, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}
