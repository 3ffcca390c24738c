use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::LibraryError;
use super::model::FileRef;

/// Something the user selected to load lectures from.
#[derive(Debug, Clone, PartialEq)]
pub enum Folder {
    /// A live directory that can be enumerated again on refresh.
    Directory(PathBuf),
    /// A flat list of files; the containing folder is only a display hint.
    Files(Vec<PathBuf>),
}

impl Folder {
    /// Interpret command-line or prompt paths: a single directory is a live
    /// folder, anything else is an explicit file list.
    pub fn from_paths(mut paths: Vec<PathBuf>) -> Option<Self> {
        match paths.len() {
            0 => None,
            1 if paths[0].is_dir() => paths.pop().map(Folder::Directory),
            _ => Some(Folder::Files(paths)),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Folder::Directory(dir) => dir_name(dir).unwrap_or_else(|| dir.display().to_string()),
            Folder::Files(paths) => paths
                .first()
                .and_then(|p| p.parent())
                .and_then(dir_name)
                .unwrap_or_else(|| "Selected Files".to_string()),
        }
    }

    pub fn is_refreshable(&self) -> bool {
        matches!(self, Folder::Directory(_))
    }

    /// Produce the raw file list for the library builder.
    pub fn enumerate(&self, settings: &LibrarySettings) -> Result<Vec<FileRef>, LibraryError> {
        match self {
            Folder::Directory(dir) => scan_dir(dir, settings),
            Folder::Files(paths) => Ok(paths.iter().cloned().map(FileRef::from_path).collect()),
        }
    }
}

fn dir_name(dir: &Path) -> Option<String> {
    // `canonicalize` resolves "." and ".." into a real name when possible.
    let resolved = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn scan_dir(dir: &Path, settings: &LibrarySettings) -> Result<Vec<FileRef>, LibraryError> {
    // Surface an unreadable root as an error instead of an empty walk.
    fs::read_dir(dir).map_err(|source| LibraryError::FolderUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory's entries.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut files = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() && !entry.path().is_file() {
            continue;
        }
        files.push(FileRef {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
            size: entry.metadata().ok().map(|m| m.len()),
        });
    }

    tracing::debug!(dir = %dir.display(), entries = files.len(), "scanned folder");
    Ok(files)
}
