//! Loading the documentation corpus from disk
//!
//! A content directory holds `.json` and `.toml` files. Each file carries a
//! list of `page` entries (an `id` plus the page fields) and optionally a
//! list of `changelog` entries:
//!
//! ```toml
//! [[page]]
//! id = "math"
//! title = "Math"
//! category = "Libraries/Core"
//!
//! [[page.methods]]
//! name = "sqrt"
//! ret = "float"
//! params = "(x: float)"
//! ```
//!
//! Files are read in sorted path order and pages are registered in file
//! order, which makes that the registration order for collisions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::changelog::{Changelog, ChangelogEntry};
use crate::content::PageRecord;
use crate::error::{DocsError, DocsResult};
use crate::registry::Registry;

/// Serialization format of a content file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Json,
    Toml,
}

impl ContentFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(ContentFormat::Json),
            "toml" => Some(ContentFormat::Toml),
            _ => None,
        }
    }
}

/// A page entry as written in a content file
#[derive(Debug, Clone, Deserialize)]
pub struct PageDocument {
    pub id: String,
    #[serde(flatten)]
    pub record: PageRecord,
}

#[derive(Debug, Default, Deserialize)]
struct ContentFile {
    #[serde(default, rename = "page")]
    pages: Vec<PageDocument>,
    #[serde(default)]
    changelog: Vec<ChangelogEntry>,
}

/// Everything loaded from a content source
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub registry: Registry,
    pub changelog: Changelog,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every content file below `dir`, in sorted path order
    ///
    /// # Errors
    /// Returns an error if the directory is missing or a file cannot be
    /// read or parsed.
    pub fn load_dir(dir: &Path) -> DocsResult<Self> {
        if !dir.is_dir() {
            return Err(DocsError::MissingContent(dir.to_path_buf()));
        }

        let mut corpus = Self::new();
        for path in content_files(dir)? {
            corpus.load_file(&path)?;
        }
        tracing::info!(
            dir = %dir.display(),
            pages = corpus.registry.len(),
            changelog = corpus.changelog.len(),
            "loaded documentation content"
        );
        Ok(corpus)
    }

    /// Load a single content file into this corpus
    ///
    /// # Errors
    /// Returns an error for an unknown extension, an unreadable file or
    /// malformed content.
    pub fn load_file(&mut self, path: &Path) -> DocsResult<()> {
        let format =
            ContentFormat::from_path(path).ok_or_else(|| DocsError::UnsupportedFormat(path.to_path_buf()))?;
        let text = fs::read_to_string(path).map_err(|e| DocsError::io(path, e))?;
        let file = parse(&text, format, path)?;
        tracing::debug!(
            path = %path.display(),
            pages = file.pages.len(),
            changelog = file.changelog.len(),
            "read content file"
        );
        self.absorb(file);
        Ok(())
    }

    /// Load content from a string, as if read from a file named `origin`
    ///
    /// # Errors
    /// Returns an error if `text` is not valid content in `format`.
    pub fn load_str(&mut self, text: &str, format: ContentFormat, origin: &Path) -> DocsResult<()> {
        let file = parse(text, format, origin)?;
        self.absorb(file);
        Ok(())
    }

    /// Load a file holding only changelog entries
    ///
    /// # Errors
    /// Returns an error for an unknown extension, an unreadable file or
    /// malformed content.
    pub fn load_changelog(&mut self, path: &Path) -> DocsResult<()> {
        let before = self.registry.len();
        self.load_file(path)?;
        if self.registry.len() != before {
            tracing::warn!(path = %path.display(), "changelog file also defines pages");
        }
        Ok(())
    }

    fn absorb(&mut self, file: ContentFile) {
        for PageDocument { id, record } in file.pages {
            self.registry.register(id, record);
        }
        self.changelog.extend(file.changelog);
    }
}

fn parse(text: &str, format: ContentFormat, path: &Path) -> DocsResult<ContentFile> {
    match format {
        ContentFormat::Json => serde_json::from_str(text).map_err(|source| DocsError::Json {
            path: path.to_path_buf(),
            source,
        }),
        ContentFormat::Toml => toml::from_str(text).map_err(|source| DocsError::Toml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Content files directly inside or below `dir`, sorted
fn content_files(dir: &Path) -> DocsResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current).map_err(|e| DocsError::io(&current, e))?;
        for entry in entries {
            let path = entry.map_err(|e| DocsError::io(&current, e))?.path();
            if path.is_dir() {
                pending.push(path);
            } else if ContentFormat::from_path(&path).is_some() {
                files.push(path);
            } else {
                tracing::trace!(path = %path.display(), "skipping non-content file");
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MATH_TOML: &str = r#"
[[page]]
id = "math"
title = "Math"
category = ["Libraries", "Core"]

[[page.methods]]
name = "sqrt"
return_type = "float"
params = "(x: float)"
example = ["math.sqrt(4)", "math.sqrt(2.0)"]
since = "v0.0.1"
"#;

    const NET_JSON: &str = r#"{
  "page": [
    {"id": "net", "title": "Net", "category": "Libraries/Network", "order": 2,
     "methods": [{"name": "connect", "ret": "Socket", "params": "(url: String)", "example": "net.connect(url)"}]}
  ],
  "changelog": [
    {"version": "v0.0.2", "date": "2026-02-17", "changes": ["Networking"]}
  ]
}"#;

    #[test]
    fn test_load_toml_page() {
        let mut corpus = Corpus::new();
        corpus
            .load_str(MATH_TOML, ContentFormat::Toml, Path::new("math.toml"))
            .unwrap();

        let math = corpus.registry.get("math").unwrap();
        assert_eq!(math.category.to_string(), "Libraries/Core");
        assert_eq!(math.methods[0].ret, "float");
        assert_eq!(math.methods[0].example.len(), 2);
        assert_eq!(math.methods[0].status.implemented.as_deref(), Some("v0.0.1"));
    }

    #[test]
    fn test_load_json_with_changelog() {
        let mut corpus = Corpus::new();
        corpus
            .load_str(NET_JSON, ContentFormat::Json, Path::new("net.json"))
            .unwrap();

        assert_eq!(corpus.registry.get("net").unwrap().order, Some(2));
        assert_eq!(corpus.changelog.len(), 1);
        assert_eq!(corpus.changelog.entries()[0].changes, vec!["Networking"]);
    }

    #[test]
    fn test_load_dir_sorted_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"page": [{"id": "shared", "title": "From B", "category": "Manual"}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("a.toml"),
            "[[page]]\nid = \"shared\"\ntitle = \"From A\"\ncategory = \"Manual\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let corpus = Corpus::load_dir(dir.path()).unwrap();
        assert_eq!(corpus.registry.len(), 1);
        assert_eq!(corpus.registry.get("shared").unwrap().title, "From B");
    }

    #[test]
    fn test_nested_directories_loaded() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("libraries")).unwrap();
        fs::write(dir.path().join("libraries").join("math.toml"), MATH_TOML).unwrap();

        let corpus = Corpus::load_dir(dir.path()).unwrap();
        assert!(corpus.registry.contains("math"));
    }

    #[test]
    fn test_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            Corpus::load_dir(&missing),
            Err(DocsError::MissingContent(_))
        ));

        let mut corpus = Corpus::new();
        assert!(matches!(
            corpus.load_file(Path::new("pages.yaml")),
            Err(DocsError::UnsupportedFormat(_))
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(corpus.load_file(&bad), Err(DocsError::Json { .. })));
    }
}
