use super::folder::folder_from_input;
use super::*;
use crate::config::Settings;
use crate::library::{Folder, MediaSource};
use crate::playback::{PlaybackEvent, PlayerCmd};
use crate::progress::{ProgressRecord, ProgressStore, Reconcile};
use crate::storage::{FOLDER_NAME_KEY, KeyValueStore, MemoryStore, PROGRESS_KEY, StorageError};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

/// A store the test can keep inspecting after handing a clone to the app.
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl SharedStore {
    fn value(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).unwrap()
    }

    fn progress(&self) -> ProgressStore {
        ProgressStore::load(&*self.0.borrow())
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().set(key, value)
    }
}

fn course(names: &[&str]) -> TempDir {
    let dir = tempdir().unwrap();
    for name in names {
        fs::write(dir.path().join(name), b"").unwrap();
    }
    dir
}

fn app_with(store: &SharedStore) -> App {
    App::new(Settings::default(), Box::new(store.clone()))
}

fn open(app: &mut App, dir: &Path, now: Instant) -> Vec<PlayerCmd> {
    app.open_folder(Folder::Directory(dir.to_path_buf()), now)
}

fn loaded(id: &str, duration: f64) -> PlaybackEvent {
    PlaybackEvent::Loaded {
        id: id.into(),
        duration,
    }
}

fn at(id: &str, position: f64, duration: f64) -> PlaybackEvent {
    PlaybackEvent::PositionChanged {
        id: id.into(),
        position,
        duration,
    }
}

fn loaded_id(cmds: &[PlayerCmd]) -> Option<&str> {
    cmds.iter().find_map(|c| match c {
        PlayerCmd::Load { id, .. } => Some(id.as_str()),
        _ => None,
    })
}

#[test]
fn starts_with_samples_and_restored_state() {
    let store = SharedStore::default();
    store
        .0
        .borrow_mut()
        .set(
            PROGRESS_KEY,
            r#"{"sample_1":{"currentTime":120,"duration":1800,"completed":false,"watchPercentage":6.6}}"#,
        )
        .unwrap();
    store
        .0
        .borrow_mut()
        .set(FOLDER_NAME_KEY, "Rust Course")
        .unwrap();

    let app = app_with(&store);
    assert_eq!(app.items().len(), 2);
    assert!(app.items().iter().all(|i| i.is_built_in));
    assert_eq!(app.record("sample_1").unwrap().current_time, 120.0);
    assert_eq!(*app.record("sample_2").unwrap(), ProgressRecord::new(2100.0));
    assert_eq!(app.folder_name(), Some("Rust Course"));
    assert!(!app.has_folder());
    assert_eq!(app.rate(), 1.0);
}

#[test]
fn opening_a_folder_builds_an_ordered_library() {
    let dir = course(&["10 - wrapup.mp4", "2 - intro.mp4", "notes.pdf"]);
    let store = SharedStore::default();
    let mut app = app_with(&store);

    let cmds = open(&mut app, dir.path(), Instant::now());
    assert_eq!(cmds, vec![PlayerCmd::Stop]);

    let titles: Vec<&str> = app.items().iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["intro", "wrapup"]);
    assert_eq!(app.library().local_count(), 2);
    assert!(app.has_folder());
    let notice = app.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.text, "2 videos found");

    let name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(app.folder_name(), Some(name.as_str()));
    assert_eq!(store.value(FOLDER_NAME_KEY), Some(name));

    // Saved right away, zero state for each new lecture.
    let saved = store.progress();
    assert_eq!(saved.len(), 2);
    assert_eq!(*saved.get("file_1").unwrap(), ProgressRecord::new(0.0));
}

#[test]
fn empty_selection_changes_nothing() {
    let dir = course(&["notes.txt", "slides.pdf"]);
    let store = SharedStore::default();
    let mut app = app_with(&store);
    let before = store.value(PROGRESS_KEY);

    let cmds = open(&mut app, dir.path(), Instant::now());
    assert!(cmds.is_empty());
    assert!(app.items().iter().all(|i| i.is_built_in));
    assert!(!app.has_folder());
    assert_eq!(store.value(PROGRESS_KEY), before);
    assert_eq!(store.value(FOLDER_NAME_KEY), None);

    let notice = app.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.text.contains("MP4, MOV, AVI, MKV, WEBM, M4V"));
}

#[test]
fn missing_folder_is_reported_as_unreadable() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("gone");
    let mut app = app_with(&SharedStore::default());

    app.begin_open_prompt();
    for c in missing.display().to_string().chars() {
        app.push_prompt_char(c);
    }
    let cmds = app.submit_open_prompt(Instant::now());

    assert!(cmds.is_empty());
    assert!(app.open_prompt.is_none());
    assert!(app.notice().unwrap().text.starts_with("Error accessing folder"));
}

#[test]
fn cancelled_selection_is_silent() {
    let mut app = app_with(&SharedStore::default());

    app.begin_open_prompt();
    app.cancel_open_prompt();
    assert!(app.notice().is_none());

    app.begin_open_prompt();
    app.push_prompt_char(' ');
    assert!(app.submit_open_prompt(Instant::now()).is_empty());
    assert!(app.notice().is_none());
    assert!(app.open_prompt.is_none());
}

#[test]
fn prompt_input_is_interpreted_by_what_exists() {
    let dir = course(&["a.mp4"]);
    assert_eq!(folder_from_input("   "), None);
    assert_eq!(
        folder_from_input(&dir.path().display().to_string()),
        Some(Folder::Directory(dir.path().to_path_buf()))
    );
    let file = dir.path().join("a.mp4");
    assert_eq!(
        folder_from_input(&file.display().to_string()),
        Some(Folder::Files(vec![file]))
    );
}

#[test]
fn new_folder_discards_progress_even_when_ids_coincide() {
    let first = course(&["1 - a.mp4", "2 - b.mp4"]);
    let second = course(&["1 - x.mp4", "2 - y.mp4"]);
    let store = SharedStore::default();
    let mut app = app_with(&store);
    let now = Instant::now();

    open(&mut app, first.path(), now);
    app.load_lecture(0, now);
    app.handle_playback_event(loaded("file_1", 100.0), now);
    app.handle_playback_event(at("file_1", 60.0, 100.0), now);
    assert_eq!(app.record("file_1").unwrap().current_time, 60.0);

    let later = now + Duration::from_secs(5);
    open(&mut app, second.path(), later);
    assert_eq!(*app.record("file_1").unwrap(), ProgressRecord::new(0.0));
    assert_eq!(*store.progress().get("file_1").unwrap(), ProgressRecord::new(0.0));
    assert!(app.current_item().is_none());
    assert_eq!(app.playback, PlaybackState::Stopped);
}

#[test]
fn retained_selection_resumes_persisted_progress() {
    let dir = course(&["1 - a.mp4", "2 - b.mp4"]);
    let store = SharedStore::default();
    store
        .0
        .borrow_mut()
        .set(
            PROGRESS_KEY,
            r#"{"file_1":{"currentTime":30,"duration":100,"completed":false,"watchPercentage":30}}"#,
        )
        .unwrap();
    let mut app = app_with(&store);
    let now = Instant::now();

    app.select_folder(Folder::Directory(dir.path().to_path_buf()), Reconcile::Retain, now)
        .unwrap();
    assert_eq!(app.record("file_1").unwrap().current_time, 30.0);

    let cmds = app.load_lecture(0, now);
    match &cmds[..] {
        [
            PlayerCmd::Load {
                id,
                source: MediaSource::File(path),
                duration_hint: Some(100.0),
            },
        ] => {
            assert_eq!(id, "file_1");
            assert!(path.ends_with("1 - a.mp4"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(app.playback, PlaybackState::Loading);

    let cmds = app.handle_playback_event(loaded("file_1", 100.9), now);
    assert_eq!(cmds, vec![PlayerCmd::SeekTo(30.0), PlayerCmd::Play]);
    assert_eq!(app.items()[0].duration, 100.0);
    assert_eq!(app.record("file_1").unwrap().duration, 100.0);
}

#[test]
fn initial_zero_position_does_not_clobber_the_resume_point() {
    let dir = course(&["1 - a.mp4"]);
    let store = SharedStore::default();
    store
        .0
        .borrow_mut()
        .set(
            PROGRESS_KEY,
            r#"{"file_1":{"currentTime":30,"duration":100,"completed":false,"watchPercentage":30}}"#,
        )
        .unwrap();
    let mut app = app_with(&store);
    let now = Instant::now();
    app.restore_folder(Folder::Directory(dir.path().to_path_buf()), now);

    let later = now + Duration::from_secs(5);
    app.load_lecture(0, later);
    let cmds = app.handle_playback_event(loaded("file_1", 100.0), later);
    assert_eq!(cmds, vec![PlayerCmd::SeekTo(30.0), PlayerCmd::Play]);

    app.handle_playback_event(at("file_1", 0.0, 100.0), later);
    app.tick(later + Duration::from_secs(2));
    assert_eq!(app.record("file_1").unwrap().current_time, 30.0);
    assert_eq!(store.progress().get("file_1").unwrap().current_time, 30.0);

    // Once the seek lands, positions flow again.
    app.handle_playback_event(at("file_1", 30.0, 100.0), later + Duration::from_secs(3));
    app.handle_playback_event(at("file_1", 31.0, 100.0), later + Duration::from_secs(4));
    assert_eq!(app.position, 31.0);
    assert_eq!(app.record("file_1").unwrap().current_time, 31.0);
}

#[test]
fn restored_folder_takes_durations_from_saved_progress() {
    let dir = course(&["1 - a.mkv", "2 - b.mkv"]);
    let store = SharedStore::default();
    store
        .0
        .borrow_mut()
        .set(
            PROGRESS_KEY,
            r#"{"file_1":{"currentTime":0,"duration":100,"completed":true,"watchPercentage":100},
                "file_2":{"currentTime":100,"duration":200,"completed":false,"watchPercentage":50}}"#,
        )
        .unwrap();
    let mut app = app_with(&store);
    let now = Instant::now();
    app.restore_folder(Folder::Directory(dir.path().to_path_buf()), now);

    let durations: Vec<f64> = app.items().iter().map(|i| i.duration).collect();
    assert_eq!(durations, vec![100.0, 200.0]);

    let agg = app.aggregate();
    assert_eq!(agg.completed_count, 1);
    assert_eq!(agg.total_count, 2);
    assert_eq!(agg.percent_complete, 50.0);
    assert_eq!(agg.completed_seconds, 200.0);
    assert_eq!(agg.remaining_seconds, 100.0);

    match &app.load_lecture(1, now)[..] {
        [PlayerCmd::Load { id, duration_hint, .. }] => {
            assert_eq!(id, "file_2");
            assert_eq!(*duration_hint, Some(200.0));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn replaced_library_locators_stop_resolving() {
    let first = course(&["a.mp4"]);
    let second = course(&["b.mp4"]);
    let mut app = app_with(&SharedStore::default());
    let now = Instant::now();

    open(&mut app, first.path(), now);
    let old = app.items()[0].clone();
    assert!(app.library().resolve(&old).is_some());

    open(&mut app, second.path(), now);
    assert!(app.library().resolve(&old).is_none());
    assert_eq!(app.library().live_locators(), 1);
}

#[test]
fn completed_lecture_restarts_from_the_top() {
    let dir = course(&["a.mp4"]);
    let mut app = app_with(&SharedStore::default());
    let now = Instant::now();
    open(&mut app, dir.path(), now);

    app.load_lecture(0, now);
    app.handle_playback_event(loaded("file_1", 100.0), now);
    app.handle_playback_event(at("file_1", 97.0, 100.0), now);
    assert!(app.record("file_1").unwrap().completed);

    app.load_lecture(0, now);
    let cmds = app.handle_playback_event(loaded("file_1", 100.0), now);
    assert_eq!(cmds, vec![PlayerCmd::Play]);
}

#[test]
fn stale_events_are_ignored() {
    let dir = course(&["a.mp4", "b.mp4"]);
    let mut app = app_with(&SharedStore::default());
    let now = Instant::now();
    open(&mut app, dir.path(), now);

    app.load_lecture(0, now);
    app.load_lecture(1, now);
    let cmds = app.handle_playback_event(loaded("file_1", 100.0), now);
    assert!(cmds.is_empty());
    app.handle_playback_event(at("file_1", 50.0, 100.0), now);

    assert_eq!(app.items()[0].duration, 0.0);
    assert_eq!(app.record("file_1").unwrap().current_time, 0.0);
    assert_eq!(app.playback, PlaybackState::Loading);
}

#[test]
fn positions_are_saved_at_most_once_per_interval() {
    let dir = course(&["a.mp4"]);
    let store = SharedStore::default();
    let mut app = app_with(&store);
    let now = Instant::now();
    open(&mut app, dir.path(), now);
    app.load_lecture(0, now);
    app.handle_playback_event(loaded("file_1", 100.0), now);

    app.handle_playback_event(at("file_1", 10.0, 100.0), now + Duration::from_millis(200));
    assert_eq!(app.record("file_1").unwrap().current_time, 10.0);
    assert_eq!(store.progress().get("file_1").unwrap().current_time, 0.0);

    app.handle_playback_event(at("file_1", 11.0, 100.0), now + Duration::from_millis(1000));
    assert_eq!(store.progress().get("file_1").unwrap().current_time, 11.0);

    // A held-back update is flushed by the housekeeping tick.
    app.handle_playback_event(at("file_1", 12.0, 100.0), now + Duration::from_millis(1500));
    assert_eq!(store.progress().get("file_1").unwrap().current_time, 11.0);
    app.tick(now + Duration::from_millis(2000));
    assert_eq!(store.progress().get("file_1").unwrap().current_time, 12.0);
}

#[test]
fn switching_lectures_saves_the_one_being_left() {
    let dir = course(&["a.mp4", "b.mp4"]);
    let store = SharedStore::default();
    let mut app = app_with(&store);
    let now = Instant::now();
    open(&mut app, dir.path(), now);

    app.load_lecture(0, now);
    app.handle_playback_event(loaded("file_1", 100.0), now);
    app.handle_playback_event(at("file_1", 42.0, 100.0), now);
    assert_eq!(store.progress().get("file_1").unwrap().current_time, 0.0);

    let cmds = app.next_lecture(now);
    assert_eq!(loaded_id(&cmds), Some("file_2"));
    assert_eq!(store.progress().get("file_1").unwrap().current_time, 42.0);
}

#[test]
fn natural_end_completes_and_advances_after_the_delay() {
    let dir = course(&["a.mp4", "b.mp4"]);
    let store = SharedStore::default();
    let mut app = app_with(&store);
    let now = Instant::now();
    open(&mut app, dir.path(), now);
    app.load_lecture(0, now);
    app.handle_playback_event(loaded("file_1", 100.0), now);

    app.handle_playback_event(PlaybackEvent::Ended { id: "file_1".into() }, now);
    let rec = *store.progress().get("file_1").unwrap();
    assert!(rec.completed);
    assert_eq!(rec.watch_percentage, 100.0);
    assert_eq!(rec.current_time, 0.0);

    assert!(app.tick(now + Duration::from_millis(1500)).is_empty());
    let cmds = app.tick(now + Duration::from_millis(2000));
    assert_eq!(loaded_id(&cmds), Some("file_2"));
    assert_eq!(app.current_index(), Some(1));
}

#[test]
fn last_lecture_end_does_not_advance() {
    let dir = course(&["a.mp4"]);
    let mut app = app_with(&SharedStore::default());
    let now = Instant::now();
    open(&mut app, dir.path(), now);
    app.load_lecture(0, now);

    app.handle_playback_event(PlaybackEvent::Ended { id: "file_1".into() }, now);
    assert!(app.tick(now + Duration::from_secs(10)).is_empty());
    assert_eq!(app.current_index(), Some(0));
}

#[test]
fn playback_error_is_transient_and_leaves_progress_alone() {
    let dir = course(&["a.mkv"]);
    let mut app = app_with(&SharedStore::default());
    let now = Instant::now();
    open(&mut app, dir.path(), now);
    app.load_lecture(0, now);

    app.handle_playback_event(
        PlaybackEvent::Error {
            id: "file_1".into(),
            message: "duration unknown".into(),
        },
        now,
    );
    assert_eq!(app.playback, PlaybackState::Stopped);
    assert_eq!(*app.record("file_1").unwrap(), ProgressRecord::new(0.0));
    assert!(app.notice().unwrap().text.contains("duration unknown"));

    app.tick(now + Duration::from_millis(4000));
    assert!(app.notice().is_some());
    app.tick(now + Duration::from_millis(5000));
    assert!(app.notice().is_none());
}

#[test]
fn lecture_navigation_does_not_wrap() {
    let dir = course(&["a.mp4", "b.mp4"]);
    let mut app = app_with(&SharedStore::default());
    let now = Instant::now();
    open(&mut app, dir.path(), now);

    assert!(app.next_lecture(now).is_empty());
    app.load_lecture(0, now);
    assert!(app.previous_lecture(now).is_empty());
    assert_eq!(loaded_id(&app.next_lecture(now)), Some("file_2"));
    assert!(app.next_lecture(now).is_empty());
    assert_eq!(loaded_id(&app.previous_lecture(now)), Some("file_1"));
}

#[test]
fn transport_commands_wait_for_a_loaded_lecture() {
    let mut app = app_with(&SharedStore::default());
    let now = Instant::now();
    assert!(app.toggle_pause().is_empty());
    assert!(app.seek_relative(true).is_empty());

    app.load_lecture(0, now);
    assert!(app.toggle_pause().is_empty());

    app.handle_playback_event(loaded("sample_1", 1800.0), now);
    assert_eq!(app.toggle_pause(), vec![PlayerCmd::TogglePause]);
    assert_eq!(app.seek_relative(false), vec![PlayerCmd::SeekBy(-10.0)]);
    assert_eq!(app.seek_relative(true), vec![PlayerCmd::SeekBy(10.0)]);
}

#[test]
fn rate_cycling_stops_at_the_ends() {
    let mut app = app_with(&SharedStore::default());

    assert_eq!(app.cycle_rate(true), vec![PlayerCmd::SetRate(1.25)]);
    for _ in 0..10 {
        app.cycle_rate(true);
    }
    assert_eq!(app.rate(), 2.0);
    assert!(app.cycle_rate(true).is_empty());

    for _ in 0..10 {
        app.cycle_rate(false);
    }
    assert_eq!(app.rate(), 0.5);
}

#[test]
fn refresh_rescans_directories_only() {
    let dir = course(&["1 - a.mp4"]);
    let mut app = app_with(&SharedStore::default());
    let now = Instant::now();

    assert!(app.refresh(now).is_empty());
    assert!(app.open_prompt.is_some());
    app.cancel_open_prompt();
    app.dismiss_notice();

    open(&mut app, dir.path(), now);
    fs::write(dir.path().join("2 - b.mp4"), b"").unwrap();
    assert_eq!(app.refresh(now), vec![PlayerCmd::Stop]);
    assert_eq!(app.items().len(), 2);

    let file = dir.path().join("1 - a.mp4");
    app.open_folder(Folder::Files(vec![file]), now);
    assert_eq!(app.items().len(), 1);
    assert!(app.refresh(now).is_empty());
    assert_eq!(app.items().len(), 1);
    assert!(app.open_prompt.is_some());
    assert!(app.notice().unwrap().text.contains("select the folder again"));
}

#[test]
fn cursor_wraps_but_stays_in_range() {
    let mut app = app_with(&SharedStore::default());
    app.prev();
    assert_eq!(app.selected, 1);
    app.next();
    assert_eq!(app.selected, 0);
    app.select_last();
    assert_eq!(app.selected, 1);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn shutdown_saves_and_releases() {
    let dir = course(&["a.mp4"]);
    let store = SharedStore::default();
    let mut app = app_with(&store);
    let now = Instant::now();
    open(&mut app, dir.path(), now);
    app.load_lecture(0, now);
    app.handle_playback_event(loaded("file_1", 100.0), now);
    app.handle_playback_event(at("file_1", 33.0, 100.0), now);

    app.shutdown(now);
    assert_eq!(store.progress().get("file_1").unwrap().current_time, 33.0);
    assert_eq!(app.library().live_locators(), 0);
}

#[test]
fn failed_restore_keeps_the_samples_and_says_why() {
    let dir = course(&["readme.md"]);
    let store = SharedStore::default();
    let mut app = app_with(&store);

    let cmds = app.restore_folder(Folder::Directory(dir.path().to_path_buf()), Instant::now());
    assert!(cmds.is_empty());
    assert!(!app.has_folder());
    assert_eq!(app.items().len(), 2);
    assert!(app.notice().unwrap().text.starts_with("No video files found"));
    assert_eq!(store.value(PROGRESS_KEY), None);
}
