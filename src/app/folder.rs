use std::path::PathBuf;
use std::time::Instant;

use crate::library::{self, Folder, LibraryError};
use crate::playback::PlayerCmd;
use crate::progress::Reconcile;
use crate::storage::FOLDER_NAME_KEY;

use super::model::{App, PlaybackState};

impl App {
    /// Swap in the library built from `folder`.
    ///
    /// On error the current library, progress and player are left exactly
    /// as they were. On success the player is told to stop, progress is
    /// saved, the old library's locators are released and the new library
    /// is reconciled with `mode` before being saved again.
    pub fn select_folder(
        &mut self,
        folder: Folder,
        mode: Reconcile,
        now: Instant,
    ) -> Result<Vec<PlayerCmd>, LibraryError> {
        let files = folder.enumerate(&self.settings.library)?;
        let library = library::build(files, &self.settings.library)?;

        self.save_progress(now);
        self.library.release();
        self.library = library;
        self.progress.reconcile(self.library.items(), mode);
        if mode == Reconcile::Retain {
            let restored = self.progress.restore_durations(self.library.items_mut());
            tracing::debug!(restored, "durations restored from saved progress");
        }

        let name = folder.display_name();
        if let Err(e) = self.storage.set(FOLDER_NAME_KEY, &name) {
            tracing::warn!(error = %e, "could not persist folder name");
        }
        tracing::info!(
            folder = %name,
            videos = self.library.len(),
            ?mode,
            "folder selected"
        );
        self.folder_name = Some(name);
        self.folder = Some(folder);

        self.selected = 0;
        self.current = None;
        self.playback = PlaybackState::Stopped;
        self.position = 0.0;
        self.duration = 0.0;
        self.pending_advance = None;
        self.resume_target = None;
        self.details_window = false;
        let found = format!("{} videos found", self.library.len());
        self.show_info(found, now);

        self.save_progress(now);
        Ok(vec![PlayerCmd::Stop])
    }

    /// In-app selection: a fresh folder always starts from zero progress.
    /// Failures become a notice; cancellation is silent.
    pub fn open_folder(&mut self, folder: Folder, now: Instant) -> Vec<PlayerCmd> {
        match self.select_folder(folder, Reconcile::Replace, now) {
            Ok(cmds) => cmds,
            Err(e) => {
                self.report(&e);
                Vec::new()
            }
        }
    }

    /// Startup selection: progress persisted by earlier sessions is kept
    /// and matched to the rebuilt library by id.
    pub fn restore_folder(&mut self, folder: Folder, now: Instant) -> Vec<PlayerCmd> {
        match self.select_folder(folder, Reconcile::Retain, now) {
            Ok(cmds) => cmds,
            Err(e) => {
                self.report(&e);
                Vec::new()
            }
        }
    }

    /// Re-scan the current folder.
    ///
    /// Explicit file lists and the sample library cannot be re-read; the
    /// user is asked to pick the folder again instead.
    pub fn refresh(&mut self, now: Instant) -> Vec<PlayerCmd> {
        match self.folder.clone() {
            Some(folder) if folder.is_refreshable() => self.open_folder(folder, now),
            _ => {
                self.report(&LibraryError::NotRefreshable);
                self.open_prompt = Some(String::new());
                Vec::new()
            }
        }
    }

    pub fn begin_open_prompt(&mut self) {
        self.open_prompt = Some(String::new());
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.open_prompt.as_mut() {
            p.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.open_prompt.as_mut() {
            p.pop();
        }
    }

    pub fn cancel_open_prompt(&mut self) {
        self.open_prompt = None;
        self.report(&LibraryError::SelectionCancelled);
    }

    /// Act on the path typed into the prompt. An empty answer counts as a
    /// cancelled selection.
    pub fn submit_open_prompt(&mut self, now: Instant) -> Vec<PlayerCmd> {
        let Some(input) = self.open_prompt.take() else {
            return Vec::new();
        };
        match folder_from_input(&input) {
            Some(folder) => self.open_folder(folder, now),
            None => {
                self.report(&LibraryError::SelectionCancelled);
                Vec::new()
            }
        }
    }

    pub(super) fn report(&mut self, err: &LibraryError) {
        if err.is_silent() {
            tracing::debug!("folder selection cancelled");
            return;
        }
        tracing::warn!(error = %err, "folder selection failed");
        self.show_error(err.to_string(), None);
    }
}

/// Turn prompt input into a folder. Missing paths are treated as
/// directories so the scan reports them as unreadable.
pub(super) fn folder_from_input(input: &str) -> Option<Folder> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let path = expand_home(trimmed);
    if !path.exists() {
        return Some(Folder::Directory(path));
    }
    Folder::from_paths(vec![path])
}

fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(input)
}
