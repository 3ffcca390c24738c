//! Application model types: `App`, `PlaybackState` and `Notice`.
//!
//! `App` is the single owner of the lecture library, the progress store and
//! the durable storage handle. The runtime feeds it key presses and player
//! events; every handler returns the `PlayerCmd`s the runtime should send.

use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::library::{Folder, Item, Library};
use crate::progress::{Aggregate, ProgressRecord, ProgressStore, Reconcile, SaveThrottle};
use crate::storage::{FOLDER_NAME_KEY, KeyValueStore};

/// The playback state of the current lecture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    /// A load was requested and metadata has not arrived yet.
    Loading,
    Playing,
    Paused,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A message shown above the controls footer.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    /// `None` keeps the notice until it is dismissed or replaced.
    pub expires_at: Option<Instant>,
}

/// The main application model.
pub struct App {
    pub(super) settings: Settings,
    pub(super) library: Library,
    pub(super) progress: ProgressStore,
    pub(super) storage: Box<dyn KeyValueStore>,
    pub(super) folder: Option<Folder>,
    pub(super) folder_name: Option<String>,

    pub selected: usize,
    pub(super) current: Option<usize>,
    pub playback: PlaybackState,
    /// Last reported position and duration of the current lecture (seconds).
    pub position: f64,
    pub duration: f64,
    pub(super) rate_index: usize,

    pub(super) notice: Option<Notice>,
    /// Text typed into the open-folder prompt, while it is shown.
    pub open_prompt: Option<String>,
    pub details_window: bool,

    pub(super) pending_advance: Option<Instant>,
    /// Resume point requested after `Loaded`; earlier positions are ignored
    /// until the player reports reaching it.
    pub(super) resume_target: Option<f64>,
    pub(super) throttle: SaveThrottle,
}

impl App {
    /// Create an `App` showing the built-in sample lectures, with progress
    /// restored from `storage`.
    pub fn new(settings: Settings, storage: Box<dyn KeyValueStore>) -> Self {
        let mut progress = ProgressStore::load(storage.as_ref());
        let library = Library::samples();
        progress.reconcile(library.items(), Reconcile::Retain);

        let folder_name = match storage.get(FOLDER_NAME_KEY) {
            Ok(name) => name.filter(|n| !n.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read last folder name");
                None
            }
        };

        let rate_index = settings
            .playback
            .rates
            .iter()
            .position(|r| *r == 1.0)
            .unwrap_or(0);
        let throttle = SaveThrottle::new(Duration::from_millis(settings.progress.save_interval_ms));

        Self {
            settings,
            library,
            progress,
            storage,
            folder: None,
            folder_name,
            selected: 0,
            current: None,
            playback: PlaybackState::Stopped,
            position: 0.0,
            duration: 0.0,
            rate_index,
            notice: None,
            open_prompt: None,
            details_window: false,
            pending_advance: None,
            resume_target: None,
            throttle,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn items(&self) -> &[Item] {
        self.library.items()
    }

    pub fn has_items(&self) -> bool {
        !self.library.is_empty()
    }

    pub fn record(&self, id: &str) -> Option<&ProgressRecord> {
        self.progress.get(id)
    }

    pub fn aggregate(&self) -> Aggregate {
        self.progress.aggregate(self.library.items())
    }

    /// Display name of the selected folder, or the one remembered from the
    /// last session.
    pub fn folder_name(&self) -> Option<&str> {
        self.folder_name.as_deref()
    }

    /// Whether the shown library came from a folder chosen in this session.
    pub fn has_folder(&self) -> bool {
        self.folder.is_some()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.current.and_then(|i| self.library.get(i))
    }

    pub fn rate(&self) -> f64 {
        self.settings
            .playback
            .rates
            .get(self.rate_index)
            .copied()
            .unwrap_or(1.0)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub(super) fn show_info(&mut self, text: impl Into<String>, now: Instant) {
        self.notice = Some(Notice {
            text: text.into(),
            kind: NoticeKind::Info,
            expires_at: Some(now + self.notice_lifetime()),
        });
    }

    pub(super) fn show_error(&mut self, text: impl Into<String>, expires: Option<Instant>) {
        self.notice = Some(Notice {
            text: text.into(),
            kind: NoticeKind::Error,
            expires_at: expires,
        });
    }

    pub(super) fn notice_lifetime(&self) -> Duration {
        Duration::from_millis(self.settings.ui.notice_ms)
    }

    pub fn toggle_details_window(&mut self) {
        self.details_window = !self.details_window;
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.library.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.library.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.library.len().saturating_sub(1);
    }

    /// Persist the progress map now and restart the throttle window.
    pub(super) fn save_progress(&mut self, now: Instant) {
        self.progress.save(self.storage.as_mut());
        self.throttle.mark_saved(now);
    }

    /// Persist only if the throttle allows it.
    pub(super) fn save_progress_throttled(&mut self, now: Instant) {
        if self.throttle.should_save(now) {
            self.save_progress(now);
        }
    }
}
