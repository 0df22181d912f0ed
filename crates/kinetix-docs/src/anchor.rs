//! Navigable anchors
//!
//! An anchor names a whole page (`math`) or a section inside a page
//! (`math:methods`, `math:sqrt`). The string form doubles as the location
//! fragment and as the element id of the rendered heading.

use std::fmt;

/// Separator between page id and section in an anchor
pub const SECTION_SEPARATOR: char = ':';

/// Fragment that switches the content area to the changelog view
pub const CHANGELOG_FRAGMENT: &str = "changelog";

/// Target of a link, a heading id, or a location fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Anchor {
    page: String,
    section: Option<String>,
}

impl Anchor {
    /// Anchor of a page header
    pub fn page(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            section: None,
        }
    }

    /// Anchor of a member, keyed by its raw name (`math:sqrt`)
    pub fn member(page: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            section: Some(name.into()),
        }
    }

    /// Anchor of a titled section, keyed by the title's slug (`os:file_system`)
    pub fn section(page: impl Into<String>, title: &str) -> Self {
        Self::member(page, slugify(title))
    }

    /// Parse a location fragment, with or without the leading `#`
    ///
    /// Returns `None` for an empty fragment.
    pub fn parse(fragment: &str) -> Option<Self> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if fragment.is_empty() {
            return None;
        }
        Some(match fragment.split_once(SECTION_SEPARATOR) {
            Some((page, section)) => Self::member(page, section),
            None => Self::page(fragment),
        })
    }

    pub fn page_id(&self) -> &str {
        &self.page
    }

    pub fn section_slug(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn is_page(&self) -> bool {
        self.section.is_none()
    }

    /// Link target form, `#page` or `#page:section`
    pub fn href(&self) -> String {
        format!("#{self}")
    }

    /// Id selector with selector-significant characters escaped
    pub fn selector(&self) -> String {
        format!("#{}", escape_selector(&self.to_string()))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(f, "{}{SECTION_SEPARATOR}{}", self.page, section),
            None => f.write_str(&self.page),
        }
    }
}

/// Derive a section slug: lowercase, whitespace runs collapsed to `_`
pub fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Escape characters that carry meaning in an id selector
pub fn escape_selector(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for c in id.chars() {
        if matches!(
            c,
            ':' | '.' | '#' | '[' | ']' | '(' | ')' | ',' | '>' | '+' | '~' | '*' | '=' | '\'' | '"'
                | '\\' | ' '
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
