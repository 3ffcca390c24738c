use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// A raw file offered to the library builder by folder acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRef {
    pub name: String,
    pub path: PathBuf,
    pub size: Option<u64>,
}

impl FileRef {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size = std::fs::metadata(&path).ok().map(|m| m.len());
        Self { name, path, size }
    }
}

/// Transient handle to a local file, valid until its library is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator(u64);

// Process-wide so a revoked locator can never alias one from a later library.
static NEXT_LOCATOR: AtomicU64 = AtomicU64::new(1);

/// Where an item's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Remote(String),
    Local(Locator),
}

/// A resolved, playable location handed to the player.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    Url(String),
    File(PathBuf),
}

impl MediaSource {
    pub fn describe(&self) -> String {
        match self {
            MediaSource::Url(url) => url.clone(),
            MediaSource::File(path) => path.display().to_string(),
        }
    }
}

/// One playable lecture.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub title: String,
    /// Seconds; `0.0` until the player reports it.
    pub duration: f64,
    pub source: Source,
    pub is_built_in: bool,
    pub file_name: Option<String>,
    pub size: Option<u64>,
}

/// Live locator table owned by a `Library`.
#[derive(Debug, Default)]
pub struct Locators {
    live: HashMap<Locator, PathBuf>,
}

impl Locators {
    pub fn allocate(&mut self, path: PathBuf) -> Locator {
        let locator = Locator(NEXT_LOCATOR.fetch_add(1, Ordering::Relaxed));
        self.live.insert(locator, path);
        locator
    }

    pub fn resolve(&self, locator: &Locator) -> Option<&Path> {
        self.live.get(locator).map(PathBuf::as_path)
    }

    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Revoke every locator; returns how many were still live.
    pub fn release_all(&mut self) -> usize {
        let n = self.live.len();
        self.live.clear();
        n
    }
}

/// The ordered set of lectures currently on offer, plus the locators that
/// keep their local files reachable.
///
/// Owners must call [`Library::release`] before discarding or replacing a
/// library. Dropping one with live locators still releases them, but logs the
/// leak.
#[derive(Debug, Default)]
pub struct Library {
    items: Vec<Item>,
    locators: Locators,
}

impl Library {
    pub(crate) fn from_parts(items: Vec<Item>, locators: Locators) -> Self {
        Self { items, locators }
    }

    /// The built-in sample lectures shown before any folder is chosen.
    pub fn samples() -> Self {
        let sample = |id: &str, title: &str, duration: f64, url: &str| Item {
            id: id.to_string(),
            title: title.to_string(),
            duration,
            source: Source::Remote(url.to_string()),
            is_built_in: true,
            file_name: None,
            size: None,
        };

        Self::from_parts(
            vec![
                sample(
                    "sample_1",
                    "Sample: Introduction to Web Development",
                    1800.0,
                    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
                ),
                sample(
                    "sample_2",
                    "Sample: HTML Fundamentals",
                    2100.0,
                    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
                ),
            ],
            Locators::default(),
        )
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items backed by user files (the "N videos found" count).
    pub fn local_count(&self) -> usize {
        self.items.iter().filter(|i| !i.is_built_in).count()
    }

    /// Turn an item's source into something the player can open.
    ///
    /// Returns `None` once the library has been released.
    pub fn resolve(&self, item: &Item) -> Option<MediaSource> {
        match &item.source {
            Source::Remote(url) => Some(MediaSource::Url(url.clone())),
            Source::Local(locator) => self
                .locators
                .resolve(locator)
                .map(|p| MediaSource::File(p.to_path_buf())),
        }
    }

    #[cfg(test)]
    pub fn live_locators(&self) -> usize {
        self.locators.live_count()
    }

    /// Revoke all transient locators held by this library.
    pub fn release(&mut self) -> usize {
        let released = self.locators.release_all();
        if released > 0 {
            tracing::debug!(released, "released library locators");
        }
        released
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        let leaked = self.locators.release_all();
        if leaked > 0 {
            tracing::warn!(leaked, "library dropped without release()");
        }
    }
}
