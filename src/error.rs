use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for ghidra-provision operations
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Could not find releases file: {}", .path.display())]
    ConfigMissing { path: PathBuf },

    #[error("Couldn't decode releases file {}: {source}", .path.display())]
    MalformedData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No releases recorded in the release store")]
    EmptyStore,

    #[error("Could not fetch {url}: {reason}")]
    FetchError { url: String, reason: String },

    #[error("Response from {url} is not valid JSON: {source}")]
    DecodeError {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("'tag_name' missing from latest release response")]
    MissingTagName,

    #[error("Tag '{0}' does not follow the <name>_<version>_<suffix> convention")]
    MalformedTagName(String),

    #[error("Release '{tag}' has no downloadable assets")]
    NoAssets { tag: String },

    #[error("Could not resolve commit for tag: {0}")]
    ResolutionError(String),

    #[error("Release is incomplete, missing: {}", .missing.join(", "))]
    IncompleteRelease { missing: Vec<&'static str> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Container operation failed: {0}")]
    Image(String),

    #[error("Network lookup failed: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in ghidra-provision
pub type Result<T> = std::result::Result<T, ProvisionError>;

impl ProvisionError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ProvisionError::Config(msg.into())
    }

    /// Create a container error with context
    pub fn image(msg: impl Into<String>) -> Self {
        ProvisionError::Image(msg.into())
    }

    /// Create a network error with context
    pub fn network(msg: impl Into<String>) -> Self {
        ProvisionError::Network(msg.into())
    }

    /// Create a tag resolution error with context
    pub fn resolution(msg: impl Into<String>) -> Self {
        ProvisionError::ResolutionError(msg.into())
    }

    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        ProvisionError::FetchError {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProvisionError::config("bad ppath");
        assert_eq!(err.to_string(), "Configuration error: bad ppath");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ProvisionError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_config_missing_names_path() {
        let err = ProvisionError::ConfigMissing {
            path: PathBuf::from("some/releases.json"),
        };
        assert!(err.to_string().contains("some/releases.json"));
    }

    #[test]
    fn test_incomplete_release_lists_fields() {
        let err = ProvisionError::IncompleteRelease {
            missing: vec!["download_url", "commit_sha"],
        };
        assert_eq!(
            err.to_string(),
            "Release is incomplete, missing: download_url, commit_sha"
        );
    }

    #[test]
    fn test_fetch_error_constructor() {
        let err = ProvisionError::fetch("http://x/latest", "404 Not Found");
        let msg = err.to_string();
        assert!(msg.contains("http://x/latest"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ProvisionError::config("x"), "Configuration error"),
            (ProvisionError::image("x"), "Container operation failed"),
            (ProvisionError::network("x"), "Network lookup failed"),
            (ProvisionError::resolution("x"), "Could not resolve commit"),
            (ProvisionError::MissingTagName, "'tag_name' missing"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
