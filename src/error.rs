//! Error types for artifact-dl
//!
//! Errors fall into the categories the pipeline treats differently:
//! - Configuration errors, raised before any network call
//! - Resolution errors, raised after enumeration when the selection cannot be satisfied
//! - Transport errors from the REST API, the results service or the local filesystem
//!
//! Integrity mismatches and partially-found id lists are not errors; they are reported as
//! warnings on the [`DownloadSummary`](crate::types::DownloadSummary).

use crate::types::ArtifactId;
use thiserror::Error;

/// Result type alias for artifact-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for artifact-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which input is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The input that caused the error (e.g., "artifact-ids")
        key: Option<String>,
    },

    /// The selection could not be resolved against the enumerated artifacts
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Non-success response from the REST API or the results service
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Downloaded archive could not be read or extracted
    #[error("archive error: {0}")]
    Archive(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Errors raised when the requested artifacts cannot be found
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// No artifact with the requested name exists
    #[error("artifact not found: {name}")]
    ArtifactNotFound {
        /// The requested artifact name
        name: String,
    },

    /// None of the requested ids matched an enumerated artifact
    #[error("no artifacts found for ids: {}", join_ids(.requested))]
    NoArtifactsForIds {
        /// The ids that were requested
        requested: Vec<ArtifactId>,
    },
}

impl Error {
    /// Shorthand for a configuration error tied to an input key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Shorthand for a missing named artifact
    pub fn artifact_not_found(name: impl Into<String>) -> Self {
        Error::Resolution(ResolutionError::ArtifactNotFound { name: name.into() })
    }

    /// Whether this error was raised while validating inputs
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Config { .. })
    }

    /// Whether this error was raised because the selection matched nothing
    pub fn is_resolution(&self) -> bool {
        matches!(self, Error::Resolution(_))
    }

    /// Whether this error means the named artifact does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Resolution(ResolutionError::ArtifactNotFound { .. })
        )
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Resolution(e) => match e {
                ResolutionError::ArtifactNotFound { .. } => "artifact_not_found",
                ResolutionError::NoArtifactsForIds { .. } => "no_artifacts_for_ids",
            },
            Error::Api { .. } => "api_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
            Error::Archive(_) => "archive_error",
            Error::Other(_) => "internal_error",
        }
    }
}

pub(crate) fn join_ids(ids: &[ArtifactId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_helper_records_key() {
        let err = Error::config("bad ids", "artifact-ids");
        match &err {
            Error::Config { message, key } => {
                assert_eq!(message, "bad ids");
                assert_eq!(key.as_deref(), Some("artifact-ids"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        assert!(err.is_configuration());
        assert!(!err.is_resolution());
        assert_eq!(err.to_string(), "configuration error: bad ids");
    }

    #[test]
    fn resolution_errors_are_classified() {
        let not_found = Error::artifact_not_found("coverage");
        assert!(not_found.is_resolution());
        assert!(not_found.is_not_found());
        assert_eq!(not_found.error_code(), "artifact_not_found");
        assert_eq!(not_found.to_string(), "artifact not found: coverage");

        let no_ids = Error::from(ResolutionError::NoArtifactsForIds {
            requested: vec![ArtifactId(1), ArtifactId(22)],
        });
        assert!(no_ids.is_resolution());
        assert!(!no_ids.is_not_found());
        assert_eq!(no_ids.to_string(), "no artifacts found for ids: 1, 22");
    }

    #[test]
    fn error_codes_are_stable() {
        let cases = vec![
            (Error::config("x", "name"), "config_error"),
            (
                Error::Api {
                    status: 404,
                    message: "Not Found".into(),
                },
                "api_error",
            ),
            (Error::Io(std::io::Error::other("disk")), "io_error"),
            (Error::Archive("truncated".into()), "archive_error"),
            (Error::Other("boom".into()), "internal_error"),
        ];
        for (err, code) in cases {
            assert_eq!(err.error_code(), code, "{err}");
        }
    }

    #[test]
    fn api_error_display_includes_status() {
        let err = Error::Api {
            status: 403,
            message: "Resource not accessible by integration".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (HTTP 403): Resource not accessible by integration"
        );
    }
}
