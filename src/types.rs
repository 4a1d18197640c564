//! Core types for artifact-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::DownloadInputs;
use crate::error::{Error, Result};

/// Unique identifier for an artifact within a workflow run
///
/// Ids are stable keys: a higher id means a more recent upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(pub i64);

impl ArtifactId {
    /// Create a new ArtifactId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ArtifactId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ArtifactId> for i64 {
    fn from(id: ArtifactId) -> Self {
        id.0
    }
}

impl PartialEq<i64> for ArtifactId {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ArtifactId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A named, sized, optionally content-hashed unit of build output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact id, unique within a run
    pub id: ArtifactId,
    /// Artifact name (not unique across uploads)
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Creation time, when the source reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Expected content digest (`sha256:<hex>`); `None` disables verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// GitHub repository coordinates parsed from an `owner/repo` string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl std::str::FromStr for Repository {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(Error::config(
                format!("invalid repository: '{s}', must be in format owner/repo"),
                "repository",
            )),
        }
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A workflow run in another repository or run, reached through the public REST API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteRun {
    /// Repository that owns the run
    pub repository: Repository,
    /// Workflow run id
    pub run_id: u64,
    /// Token authorized to read the repository's actions
    pub token: String,
}

impl RemoteRun {
    /// Check the preconditions of the paginated listing path
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::config(
                "a GitHub token is required for cross-run downloads",
                "github-token",
            ));
        }
        if self.run_id == 0 {
            return Err(Error::config(
                "run id must be a number greater than zero",
                "run-id",
            ));
        }
        Ok(())
    }
}

/// Identifies where artifacts are enumerated from
///
/// Resolved once from the inputs; the two sources are never mixed within one call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunQuery {
    /// The current run, through the internal results service
    Current,
    /// Another run, through the public paginated REST API
    Remote(RemoteRun),
}

impl RunQuery {
    /// Build the query from download inputs
    ///
    /// A non-empty token selects the public path; the repository and run id then become
    /// mandatory and are validated here, before any network call.
    pub fn from_inputs(inputs: &DownloadInputs) -> Result<Self> {
        let Some(token) = non_empty(inputs.github_token.as_deref()) else {
            return Ok(Self::Current);
        };

        let repository: Repository = non_empty(inputs.repository.as_deref())
            .ok_or_else(|| {
                Error::config(
                    "repository is required when a GitHub token is provided",
                    "repository",
                )
            })?
            .parse()?;

        let raw_run_id = non_empty(inputs.run_id.as_deref()).ok_or_else(|| {
            Error::config(
                "run id is required when a GitHub token is provided",
                "run-id",
            )
        })?;
        let run_id = raw_run_id.parse::<u64>().map_err(|_| {
            Error::config(
                format!("invalid run id: '{raw_run_id}', must be a number greater than zero"),
                "run-id",
            )
        })?;

        let run = RemoteRun {
            repository,
            run_id,
            token: token.to_string(),
        };
        run.validate()?;
        Ok(Self::Remote(run))
    }

    /// Whether this query targets the public REST API
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Result of downloading a single artifact
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOutcome {
    /// Artifact id
    pub artifact_id: ArtifactId,
    /// Artifact name
    pub name: String,
    /// Directory the artifact was extracted into
    pub path: PathBuf,
    /// Whether the downloaded content did not match the expected digest
    pub digest_mismatch: bool,
}

/// Summary of a complete resolve-select-download run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DownloadSummary {
    /// Absolute root output directory
    pub download_path: PathBuf,
    /// Number of artifacts downloaded
    pub downloaded: usize,
    /// Per-artifact outcomes, in selection order
    pub outcomes: Vec<DownloadOutcome>,
    /// Non-fatal messages raised during selection and download
    pub warnings: Vec<String>,
}

impl DownloadSummary {
    /// Outcomes whose content failed digest verification
    pub fn digest_mismatches(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.iter().filter(|o| o.digest_mismatch)
    }
}

/// Trimmed value, or `None` when missing or blank
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn remote_inputs(repository: &str, run_id: &str) -> DownloadInputs {
        DownloadInputs {
            github_token: Some("ghp_test".to_string()),
            repository: Some(repository.to_string()),
            run_id: Some(run_id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn repository_parses_owner_and_repo() {
        let repo: Repository = "actions/toolkit".parse().unwrap();
        assert_eq!(repo.owner, "actions");
        assert_eq!(repo.repo, "toolkit");
        assert_eq!(repo.to_string(), "actions/toolkit");
    }

    #[test]
    fn repository_rejects_malformed_strings() {
        for bad in ["", "actions", "actions/", "/toolkit", "a/b/c"] {
            let err = bad.parse::<Repository>().unwrap_err();
            assert!(err.is_configuration(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn query_without_token_uses_current_run() {
        let inputs = DownloadInputs {
            repository: Some("ignored/repo".to_string()),
            run_id: Some("nope".to_string()),
            ..Default::default()
        };
        assert_eq!(RunQuery::from_inputs(&inputs).unwrap(), RunQuery::Current);
    }

    #[test]
    fn blank_token_counts_as_absent() {
        let inputs = DownloadInputs {
            github_token: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!RunQuery::from_inputs(&inputs).unwrap().is_remote());
    }

    #[test]
    fn query_with_token_targets_remote_run() {
        let query = RunQuery::from_inputs(&remote_inputs("octo/app", " 42 ")).unwrap();
        let RunQuery::Remote(run) = query else {
            panic!("expected remote query");
        };
        assert_eq!(run.repository.to_string(), "octo/app");
        assert_eq!(run.run_id, 42);
        assert_eq!(run.token, "ghp_test");
    }

    #[test]
    fn query_rejects_non_positive_or_non_numeric_run_id() {
        for bad in ["0", "-3", "abc", "1.5"] {
            let err = RunQuery::from_inputs(&remote_inputs("octo/app", bad)).unwrap_err();
            match err {
                Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("run-id")),
                other => panic!("unexpected error for {bad:?}: {other}"),
            }
        }
    }

    #[test]
    fn query_rejects_missing_repository() {
        let mut inputs = remote_inputs("octo/app", "7");
        inputs.repository = None;
        let err = RunQuery::from_inputs(&inputs).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn remote_run_requires_token() {
        let run = RemoteRun {
            repository: "octo/app".parse().unwrap(),
            run_id: 1,
            token: String::new(),
        };
        assert!(run.validate().unwrap_err().is_configuration());
    }
}
