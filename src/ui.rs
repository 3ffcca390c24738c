//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, NoticeKind, PlaybackState};
use crate::library::{Item, Source};
use crate::progress::{LectureStatus, ProgressRecord};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "play selected lecture".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next lecture".to_string());
    // H/L is filled dynamically from config.
    map.insert("</>".to_string(), "speed".to_string());
    map.insert("o".to_string(), "open folder".to_string());
    map.insert("R".to_string(), "refresh".to_string());
    map.insert("K".to_string(), "details".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "</>", "gg/G", "o", "R", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}s", seek_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format seconds as `M:SS`, or `Hh Mm` from one hour up.
pub fn format_time(seconds: f64) -> String {
    if !(seconds.is_finite() && seconds > 0.0) {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

fn status_icon(record: Option<&ProgressRecord>) -> &'static str {
    match record.map(ProgressRecord::status) {
        Some(LectureStatus::Completed) => "✓",
        Some(LectureStatus::InProgress) => "▶",
        _ => "○",
    }
}

fn lecture_line(item: &Item, record: Option<&ProgressRecord>) -> String {
    let duration = if item.duration > 0.0 {
        format_time(item.duration)
    } else {
        "Unknown".to_string()
    };
    let percent = record.map_or(0.0, |r| r.watch_percentage).round() as u64;
    format!(
        "{} {}  ({} • {}%)",
        status_icon(record),
        item.title,
        duration,
        percent
    )
}

/// Where the shown lectures come from, including the "N videos found" count.
fn folder_text(app: &App) -> String {
    let count = app.library().local_count();
    match (app.has_folder(), app.folder_name()) {
        (true, Some(name)) => format!("Folder: {name} ({count} videos found)"),
        (false, Some(name)) => format!("Sample lectures • last folder: {name}"),
        _ => "Sample lectures".to_string(),
    }
}

fn now_playing_text(app: &App) -> String {
    let Some(item) = app.current_item() else {
        return "Nothing playing".to_string();
    };
    let state = match app.playback {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Loading => "Loading…",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    };
    format!(
        "Lecture: {} [{} / {}] • {}",
        item.title,
        format_time(app.position),
        format_time(app.duration),
        state
    )
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn details_text(app: &App) -> String {
    let Some(item) = app.items().get(app.selected) else {
        return "No lecture selected".to_string();
    };
    let record = app.record(&item.id);
    let source = match &item.source {
        Source::Remote(url) => url.clone(),
        Source::Local(_) => app
            .library()
            .resolve(item)
            .map(|s| s.describe())
            .unwrap_or_else(|| "-".to_string()),
    };
    format!(
        "Title: {}\nFile: {}\nSize: {}\nDuration: {}\nWatched: {}% (at {})\nSource: {}",
        item.title,
        item.file_name.as_deref().unwrap_or("-"),
        item.size.map(format_size).unwrap_or_else(|| "-".to_string()),
        if item.duration > 0.0 {
            format_time(item.duration)
        } else {
            "Unknown".to_string()
        },
        record.map_or(0.0, |r| r.watch_percentage).round() as u64,
        format_time(record.map_or(0.0, |r| r.current_time)),
        source
    )
}

/// Render the entire UI into the provided `frame` using `app` state.
pub fn draw(frame: &mut Frame, app: &App) {
    let settings = app.settings();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" lectern ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = format!(
        "{} • Speed: {}x\n{}",
        now_playing_text(app),
        app.rate(),
        folder_text(app)
    );
    let status_par = Paragraph::new(status)
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Course progress
    let agg = app.aggregate();
    let label = format!(
        "{:.0}% complete • {}/{} lectures • {} watched • {} remaining",
        agg.percent_complete,
        agg.completed_count,
        agg.total_count,
        format_time(agg.completed_seconds),
        format_time(agg.remaining_seconds)
    );
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" course progress "))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio((agg.percent_complete / 100.0).clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, chunks[2]);

    // Main list
    {
        let items = app.items();
        // Center the selected item when possible by creating a visible window.
        let total = items.len();
        let list_height = chunks[3].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let current = app.current_index();
        let visible_items: Vec<ListItem> = items[start..end]
            .iter()
            .enumerate()
            .map(|(offset, item)| {
                let line = lecture_line(item, app.record(&item.id));
                if current == Some(start + offset) {
                    ListItem::new(line).style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    ListItem::new(line)
                }
            })
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" lectures "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if app.has_items() {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    // Overlay details popup (keeps list visible under it)
    if app.details_window {
        let popup_area = centered_rect_sized(80, 10, chunks[3]);
        frame.render_widget(Clear, popup_area);
        let details = Paragraph::new(details_text(app))
            .block(left_padded(" details (K closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(details, popup_area);
    }

    // Prompt or notice line
    let (message, style) = if let Some(input) = &app.open_prompt {
        (
            format!("Open folder or file: {input}_  (enter opens, esc cancels)"),
            Style::default(),
        )
    } else if let Some(notice) = app.notice() {
        let style = match notice.kind {
            NoticeKind::Info => Style::default(),
            NoticeKind::Error => Style::default().fg(Color::Red),
        };
        (notice.text.clone(), style)
    } else {
        (String::new(), Style::default())
    };
    let message_par = Paragraph::new(message)
        .style(style)
        .block(left_padded(" messages "));
    frame.render_widget(message_par, chunks[4]);

    let footer = Paragraph::new(controls_text(settings.controls.seek_seconds))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}
