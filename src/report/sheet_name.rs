//! Sheet names safe for spreadsheet export and for use as file names
//!
//! Excel limits sheet names to 31 characters, forbids `[ ] : * ? / \`,
//! forbids a leading or trailing apostrophe, reserves "History" and compares
//! names case-insensitively. Report sheets double as CSV file names, so the
//! characters Windows rejects in paths are replaced as well.

use std::collections::HashSet;

pub const MAX_SHEET_NAME_LEN: usize = 31;

const FALLBACK_NAME: &str = "Sheet";

fn is_invalid(c: char) -> bool {
    matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\' | '<' | '>' | '|' | '"') || c.is_control()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Make a single name valid; does not deal with collisions
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .trim()
        .chars()
        .map(|c| if is_invalid(c) { '_' } else { c })
        .collect();
    let truncated = truncate_chars(replaced.trim_matches('\''), MAX_SHEET_NAME_LEN);
    let cleaned = truncated.trim_matches('\'').trim();

    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else if cleaned.eq_ignore_ascii_case("history") {
        format!("{}_", cleaned)
    } else {
        cleaned.to_string()
    }
}

/// Hands out sanitized names that are unique within one workbook
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitize `name`; on a case-insensitive collision append `~2`, `~3`, ...
    pub fn assign(&mut self, name: &str) -> String {
        let base = sanitize_sheet_name(name);
        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let suffix = format!("~{}", n);
            let stem = truncate_chars(&base, MAX_SHEET_NAME_LEN - suffix.chars().count());
            let candidate = format!("{}{}", stem, suffix);
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}
