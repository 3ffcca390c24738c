use crate::config::LibrarySettings;

use super::LibraryError;
use super::model::{FileRef, Item, Library, Locators, Source};
use super::natural::natural_cmp;
use super::title::extract_title;

/// Normalized `.ext` suffixes from the configured extension list.
fn video_suffixes(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
        .collect()
}

pub(crate) fn is_video_name(name: &str, suffixes: &[String]) -> bool {
    let lower = name.to_lowercase();
    suffixes.iter().any(|s| lower.ends_with(s.as_str()))
}

/// Human-readable list of supported formats, e.g. `MP4, MOV, MKV`.
pub(crate) fn supported_formats(settings: &LibrarySettings) -> String {
    video_suffixes(settings)
        .iter()
        .map(|s| s.trim_start_matches('.').to_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Turn a raw file selection into an ordered library.
///
/// Non-video files are dropped; what remains is sorted in natural order and
/// numbered `file_1..file_n` by position. Ids are positional, so adding or
/// removing files between sessions shifts which file an id refers to.
pub fn build(files: Vec<FileRef>, settings: &LibrarySettings) -> Result<Library, LibraryError> {
    let suffixes = video_suffixes(settings);
    let offered = files.len();

    let mut videos: Vec<FileRef> = files
        .into_iter()
        .filter(|f| is_video_name(&f.name, &suffixes))
        .collect();

    if videos.is_empty() {
        tracing::info!(offered, "selection contained no video files");
        return Err(LibraryError::EmptySelection {
            formats: supported_formats(settings),
        });
    }

    videos.sort_by(|a, b| natural_cmp(&a.name, &b.name));

    let mut locators = Locators::default();
    let items: Vec<Item> = videos
        .into_iter()
        .enumerate()
        .map(|(i, file)| {
            let ordinal = i + 1;
            Item {
                id: format!("file_{ordinal}"),
                title: extract_title(&file.name, ordinal),
                duration: 0.0,
                source: Source::Local(locators.allocate(file.path)),
                is_built_in: false,
                file_name: Some(file.name),
                size: file.size,
            }
        })
        .collect();

    tracing::info!(offered, videos = items.len(), "built library");
    Ok(Library::from_parts(items, locators))
}
