//! Error types for the fallible edges of the documentation engine
//!
//! Rendering, indexing, filtering and navigation never fail. Only reading
//! content and configuration from disk can.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for loading content and configuration
pub type DocsResult<T> = Result<T, DocsError>;

/// Errors that can occur while loading content or configuration
#[derive(Error, Debug)]
pub enum DocsError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON content in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML in '{path}': {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unsupported content file '{0}', expected a .json or .toml extension")]
    UnsupportedFormat(PathBuf),

    #[error("content directory '{0}' does not exist")]
    MissingContent(PathBuf),

    #[error("configuration file '{0}' does not exist")]
    MissingConfig(PathBuf),
}

impl DocsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocsError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DocsError::UnsupportedFormat(PathBuf::from("pages/math.yaml"));
        assert_eq!(
            err.to_string(),
            "unsupported content file 'pages/math.yaml', expected a .json or .toml extension"
        );

        let err = DocsError::io(
            "content",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "failed to read 'content': gone");
    }
}
