//! Site configuration
//!
//! Read from `docs.toml`. Relative paths are resolved against the directory
//! holding the configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocsError, DocsResult};

/// Conventional configuration file name
pub const CONFIG_FILE: &str = "docs.toml";

const DEFAULT_TITLE: &str = "Kinetix Documentation";
const DEFAULT_CONTENT_DIR: &str = "content";
const DEFAULT_OUTPUT_DIR: &str = "site";

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_content() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIR)
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title shown in the sidebar header and the document title
    #[serde(default = "default_title")]
    pub title: String,
    /// Directory of content files
    #[serde(default = "default_content")]
    pub content: PathBuf,
    /// Directory the static site is written to
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Extra changelog file, outside the content directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<PathBuf>,
    /// Page shown when no fragment is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            content: default_content(),
            output: default_output(),
            changelog: None,
            landing_page: None,
        }
    }
}

impl SiteConfig {
    /// Per-user fallback location, e.g. `~/.config/kinetix/docs.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kinetix").join(CONFIG_FILE))
    }

    /// Load `path`, or the defaults if it does not exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> DocsResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no site configuration, using defaults");
            Ok(Self::default().resolved_against(path.parent()))
        }
    }

    /// Load `path`, which must exist
    ///
    /// # Errors
    /// Returns an error if the file is missing, unreadable or malformed.
    pub fn load(path: &Path) -> DocsResult<Self> {
        if !path.exists() {
            return Err(DocsError::MissingConfig(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| DocsError::io(path, e))?;
        let config: Self = toml::from_str(&content).map_err(|source| DocsError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.resolved_against(path.parent()))
    }

    /// Write the configuration as pretty TOML, creating parent directories
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn save(&self, path: &Path) -> DocsResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DocsError::io(parent, e))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| DocsError::io(path, e))
    }

    fn resolved_against(mut self, base: Option<&Path>) -> Self {
        let Some(base) = base.filter(|b| !b.as_os_str().is_empty()) else {
            return self;
        };
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.content = resolve(self.content);
        self.output = resolve(self.output);
        self.changelog = self.changelog.map(resolve);
        self
    }
}
