//! Lecture titles derived from file names.
//!
//! Matchers are tried in order and the first one that matches decides the
//! title. When none match, the stem is tidied up instead.

use std::sync::LazyLock;

use regex::Regex;

struct TitleMatcher {
    name: &'static str,
    pattern: Regex,
}

static MATCHERS: LazyLock<Vec<TitleMatcher>> = LazyLock::new(|| {
    let matcher = |name, pattern: &str| TitleMatcher {
        name,
        pattern: Regex::new(pattern).expect("title matcher pattern compiles"),
    };
    vec![
        // "01 - Introduction", "1. HTML Basics"
        matcher("numbered", r"^\d+[\s\-._]*(.*)$"),
        // "Lecture 1 - Title"
        matcher("lecture", r"(?i)^lecture[\s\-_]*\d*[\s\-._]*(.*)$"),
        // "Chapter 1 - Title"
        matcher("chapter", r"(?i)^chapter[\s\-_]*\d*[\s\-._]*(.*)$"),
    ]
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

/// Build a display title for `file_name`, the `ordinal`-th (1-based) lecture.
pub fn extract_title(file_name: &str, ordinal: usize) -> String {
    let stem = strip_extension(file_name);

    if let Some(captured) = first_match(stem) {
        let captured = captured.trim();
        return if captured.is_empty() {
            fallback_title(ordinal)
        } else {
            captured.to_string()
        };
    }

    let cleaned = stem.replace('_', " ");
    let cleaned = WHITESPACE.replace_all(&cleaned, " ");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        fallback_title(ordinal)
    } else {
        cleaned.to_string()
    }
}

fn first_match(stem: &str) -> Option<&str> {
    MATCHERS.iter().find_map(|m| {
        let caps = m.pattern.captures(stem)?;
        tracing::trace!(matcher = m.name, stem, "title matcher hit");
        Some(caps.get(1).map_or("", |c| c.as_str()))
    })
}

/// Drop a trailing `.ext` (the last dot, when something follows it).
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if pos + 1 < file_name.len() && !file_name[pos + 1..].contains('/') => {
            &file_name[..pos]
        }
        _ => file_name,
    }
}

fn fallback_title(ordinal: usize) -> String {
    format!("Lecture {ordinal}")
}
