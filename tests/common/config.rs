//! Helpers for building downloaders and inputs against a mock API server

use std::path::Path;
use artifact_dl::{ArtifactDownloader, Config, DownloadInputs};

/// Owner/repo used by every integration test
pub const REPOSITORY: &str = "octo/app";

/// Workflow run id used by every integration test
pub const RUN_ID: u64 = 4242;

/// Token the mock server expects
pub const TOKEN: &str = "ghp_integration";

/// Downloader whose public API base URL points at `api_url`
pub fn create_test_downloader(api_url: &str) -> ArtifactDownloader {
    ArtifactDownloader::new(Config {
        api_url: api_url.to_string(),
        ..Default::default()
    })
    .expect("create downloader")
}

/// Cross-run inputs targeting [`REPOSITORY`] / [`RUN_ID`] and writing into `path`
pub fn remote_inputs(path: &Path) -> DownloadInputs {
    DownloadInputs {
        path: Some(path.to_path_buf()),
        github_token: Some(TOKEN.to_string()),
        repository: Some(REPOSITORY.to_string()),
        run_id: Some(RUN_ID.to_string()),
        ..Default::default()
    }
}

/// Listing endpoint path on the mock server
pub fn listing_path() -> String {
    format!("/repos/{REPOSITORY}/actions/runs/{RUN_ID}/artifacts")
}

/// Zip endpoint path for one artifact on the mock server
pub fn zip_path(artifact_id: i64) -> String {
    format!("/repos/{REPOSITORY}/actions/artifacts/{artifact_id}/zip")
}
