//! Artifact transfer: fetching archives to disk and running the chunked executor.
//!
//! Split into focused submodules:
//! - [`executor`] - Bounded, chunk-synchronous dispatch and destination paths
//! - [`archive`] - Payload hashing and zip extraction
//!
//! [`ArtifactTransfer`] is the seam between the executor and the byte transport;
//! [`HttpArtifactTransfer`] is the production implementation.

mod archive;
pub mod executor;


use std::path::PathBuf;
use std::sync::Arc;

use reqwest::header::ACCEPT;

use crate::error::Result;
use crate::listing::ResultsClient;
use crate::types::{ArtifactId, RemoteRun};
use crate::utils::ensure_success;

pub use executor::{DOWNLOAD_CONCURRENCY, DestinationLayout, download_artifacts};

/// Parameters for downloading one artifact
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Artifact name
    pub name: String,
    /// Directory to extract the artifact into
    pub path: PathBuf,
    /// Expected content digest; `None` skips verification
    pub expected_hash: Option<String>,
}

/// Result reported by the transfer collaborator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    /// The computed digest differed from the expected one
    pub digest_mismatch: bool,
}

/// Downloads one artifact to disk
#[async_trait::async_trait]
pub trait ArtifactTransfer: Send + Sync {
    /// Download and extract the artifact, verifying its digest when one is expected
    async fn download_artifact(
        &self,
        artifact_id: ArtifactId,
        request: DownloadRequest,
    ) -> Result<TransferOutcome>;
}

/// Where archive bytes are fetched from
enum DownloadSource {
    /// `GET /repos/{owner}/{repo}/actions/artifacts/{id}/zip`, following the redirect
    Remote { api_url: String, run: RemoteRun },
    /// Signed URL issued by the results service
    Current(Arc<ResultsClient>),
}

/// [`ArtifactTransfer`] over HTTP
pub struct HttpArtifactTransfer {
    client: reqwest::Client,
    source: DownloadSource,
}

impl HttpArtifactTransfer {
    /// Transfer from another run through the public REST API
    pub fn remote(
        client: reqwest::Client,
        api_url: impl Into<String>,
        run: RemoteRun,
    ) -> Result<Self> {
        run.validate()?;
        Ok(Self {
            client,
            source: DownloadSource::Remote {
                api_url: api_url.into(),
                run,
            },
        })
    }

    /// Transfer from the current run through the results service
    pub fn current(client: reqwest::Client, results: Arc<ResultsClient>) -> Self {
        Self {
            client,
            source: DownloadSource::Current(results),
        }
    }

    async fn open(&self, artifact_id: ArtifactId, name: &str) -> Result<reqwest::Response> {
        let response = match &self.source {
            DownloadSource::Remote { api_url, run } => {
                let url = format!(
                    "{}/repos/{}/{}/actions/artifacts/{}/zip",
                    api_url.trim_end_matches('/'),
                    run.repository.owner,
                    run.repository.repo,
                    artifact_id
                );
                self.client
                    .get(url)
                    .bearer_auth(&run.token)
                    .header(ACCEPT, "application/vnd.github+json")
                    .send()
                    .await?
            }
            DownloadSource::Current(results) => {
                let url = results.signed_artifact_url(name).await?;
                self.client.get(url).send().await?
            }
        };
        ensure_success(response).await
    }
}

#[async_trait::async_trait]
impl ArtifactTransfer for HttpArtifactTransfer {
    async fn download_artifact(
        &self,
        artifact_id: ArtifactId,
        request: DownloadRequest,
    ) -> Result<TransferOutcome> {
        let response = self.open(artifact_id, &request.name).await?;
        let payload = archive::read_payload(response).await?;

        let digest_mismatch = match request.expected_hash.as_deref() {
            Some(expected) => !archive::digest_matches(expected, &payload.sha256),
            None => false,
        };
        if digest_mismatch {
            tracing::debug!(
                artifact_id = artifact_id.get(),
                expected = ?request.expected_hash,
                actual = %payload.sha256,
                "computed digest differs from expected"
            );
        }

        let size = payload.size;
        let files = archive::extract_zip(payload.file, request.path.clone()).await?;
        tracing::debug!(
            artifact_id = artifact_id.get(),
            bytes = size,
            files,
            path = %request.path.display(),
            "artifact extracted"
        );

        Ok(TransferOutcome { digest_mismatch })
    }
}
