use std::path::PathBuf;

use crate::config::{self, Settings};
use crate::library::Folder;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Pick the durable store. Without any usable location progress is kept
/// in memory for this session only.
pub fn open_storage(settings: &Settings) -> Box<dyn KeyValueStore> {
    match settings
        .progress
        .storage_path
        .clone()
        .or_else(config::default_storage_path)
    {
        Some(path) => {
            tracing::info!(path = %path.display(), "using file storage");
            Box::new(FileStore::new(path))
        }
        None => {
            tracing::warn!("no storage location available; progress will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

/// Interpret command-line arguments: one directory, or a list of files.
/// A single path that does not exist is kept as a directory so opening it
/// reports the access error.
pub fn initial_folder<I>(args: I) -> Option<Folder>
where
    I: IntoIterator<Item = String>,
{
    let paths: Vec<PathBuf> = args.into_iter().map(PathBuf::from).collect();
    match paths.as_slice() {
        [single] if !single.exists() => Some(Folder::Directory(single.clone())),
        _ => Folder::from_paths(paths),
    }
}
