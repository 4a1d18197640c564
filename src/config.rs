//! Configuration types for artifact-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for [`ArtifactDownloader`](crate::ArtifactDownloader)
///
/// Everything has a sensible default except [`runtime`](Config::runtime), which is only
/// needed to list and download artifacts of the current run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the public REST API (default: "https://api.github.com")
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Output directory used when the inputs do not name one (default: ".")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Results service access for same-run listing and download
    #[serde(default)]
    pub runtime: Option<RuntimeConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            download_dir: default_download_dir(),
            runtime: None,
        }
    }
}

/// Access to the internal results service of the current workflow run
///
/// The host process extracts these from its environment (results URL, runtime token and
/// the backend ids carried in the token's scope).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Results service base URL
    pub results_url: String,
    /// Runtime bearer token
    pub runtime_token: String,
    /// Backend id of the current workflow run
    pub workflow_run_backend_id: String,
    /// Backend id of the current workflow job run
    pub workflow_job_run_backend_id: String,
}

/// Per-invocation inputs describing what to download and where
///
/// All fields are optional; blank strings are treated as absent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DownloadInputs {
    /// Exact artifact name
    #[serde(default)]
    pub name: Option<String>,

    /// Comma-separated artifact ids (mutually exclusive with `name`)
    #[serde(default)]
    pub artifact_ids: Option<String>,

    /// Glob pattern matched against artifact names
    #[serde(default)]
    pub pattern: Option<String>,

    /// Destination directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Extract every artifact into the same directory
    #[serde(default)]
    pub merge_multiple: bool,

    /// Token for cross-run access; its presence selects the public REST API
    #[serde(default)]
    pub github_token: Option<String>,

    /// Repository owning the run, as `owner/repo`
    #[serde(default)]
    pub repository: Option<String>,

    /// Workflow run id, as given by the user
    #[serde(default)]
    pub run_id: Option<String>,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    concat!("artifact-dl/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_from_empty_json() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.api_url, "https://api.github.com");
        assert!(config.user_agent.starts_with("artifact-dl/"));
        assert_eq!(config.download_dir, PathBuf::from("."));
        assert!(config.runtime.is_none());
    }

    #[test]
    fn inputs_deserialize_from_kebab_case() {
        let inputs: DownloadInputs = serde_json::from_str(
            r#"{
                "artifact-ids": "1, 2",
                "merge-multiple": true,
                "github-token": "ghp_x",
                "repository": "octo/app",
                "run-id": "99"
            }"#,
        )
        .unwrap();

        assert_eq!(inputs.artifact_ids.as_deref(), Some("1, 2"));
        assert!(inputs.merge_multiple);
        assert_eq!(inputs.github_token.as_deref(), Some("ghp_x"));
        assert_eq!(inputs.run_id.as_deref(), Some("99"));
        assert!(inputs.name.is_none());
        assert!(inputs.path.is_none());
    }
}
