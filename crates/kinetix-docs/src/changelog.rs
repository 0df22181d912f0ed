//! Release history shown in the changelog view

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One released version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub version: String,
    /// Release date as written by the author, usually `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    /// Change descriptions, rich text
    #[serde(default)]
    pub changes: Vec<String>,
}

impl ChangelogEntry {
    pub fn new(version: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            date: date.into(),
            changes: Vec::new(),
        }
    }

    pub fn with_change(mut self, change: impl Into<String>) -> Self {
        self.changes.push(change.into());
        self
    }

    /// The date, if it is an ISO calendar date
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// Heading text, `version (date)`
    pub fn heading(&self) -> String {
        if self.date.is_empty() {
            self.version.clone()
        } else {
            format!("{} ({})", self.version, self.date)
        }
    }
}

/// Append-only list of entries, displayed in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    entries: Vec<ChangelogEntry>,
}

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ChangelogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ChangelogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<ChangelogEntry> for Changelog {
    fn extend<T: IntoIterator<Item = ChangelogEntry>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl FromIterator<ChangelogEntry> for Changelog {
    fn from_iter<T: IntoIterator<Item = ChangelogEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
