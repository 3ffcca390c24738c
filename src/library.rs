//! Lecture library: folder acquisition, filtering, ordering and titling.
//!
//! A `Folder` yields raw `FileRef`s; `build` keeps the video files, sorts them
//! in natural order and assigns positional ids and titles. The resulting
//! `Library` owns the transient locators for its local files.

mod build;
mod model;
mod natural;
mod scan;
mod title;

pub use build::build;
pub use model::*;
pub use scan::Folder;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("No video files found. Supported formats: {formats}")]
    EmptySelection { formats: String },

    #[error("Folder selection cancelled")]
    SelectionCancelled,

    #[error("Error accessing folder {}: {source}", path.display())]
    FolderUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("This selection can't be refreshed. Please select the folder again.")]
    NotRefreshable,
}

impl LibraryError {
    /// Cancellation is a user choice, not a failure worth showing.
    pub fn is_silent(&self) -> bool {
        matches!(self, LibraryError::SelectionCancelled)
    }
}
