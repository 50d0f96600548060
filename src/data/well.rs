//! Microplate well labels
//!
//! A well label is a run of row letters followed by a run of column digits
//! ("A1", "H12", "AF48"). Parsing splits it into a row label and an integer
//! column; formatting the pair back yields the label without zero-padding.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QpcrError, Result};

/// Parsed well coordinates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WellPosition {
    /// Row letters, as written in the label
    pub row: String,
    /// Column number (1-based)
    pub column: u32,
}

impl WellPosition {
    /// Parse a well label such as "A12".
    ///
    /// `index` is the table row the label came from and is only used for the
    /// error message.
    pub fn parse(label: &str, index: usize) -> Result<Self> {
        let malformed = || QpcrError::MalformedWellLabel {
            label: label.to_string(),
            row: index,
        };

        let trimmed = label.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (letters, digits) = trimmed.split_at(split);

        if letters.is_empty() || digits.is_empty() {
            return Err(malformed());
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let column: u32 = digits.parse().map_err(|_| malformed())?;
        if column == 0 {
            return Err(malformed());
        }

        Ok(Self {
            row: letters.to_string(),
            column,
        })
    }

    /// Reassemble the label, e.g. ("A", 1) -> "A1"
    pub fn label(&self) -> String {
        format!("{}{}", self.row, self.column)
    }
}

impl fmt::Display for WellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.column)
    }
}

/// Plate order for row labels: "A" < "B" < ... < "Z" < "AA" < "AB"
pub fn compare_rows(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for WellPosition {
    /// Column-major plate order: column first, then row
    fn cmp(&self, other: &Self) -> Ordering {
        self.column
            .cmp(&other.column)
            .then_with(|| compare_rows(&self.row, &other.row))
    }
}

impl PartialOrd for WellPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parse a sequence of well labels, failing on the first malformed one
pub fn parse_wells<S: AsRef<str>>(labels: &[S]) -> Result<Vec<WellPosition>> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| WellPosition::parse(label.as_ref(), i))
        .collect()
}
