//! Internal results service client for artifacts of the current run.
//!
//! The service speaks Twirp (JSON over HTTP POST). 64-bit integers are encoded as decimal
//! strings and field names may arrive in either snake_case or lowerCamelCase.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use crate::types::{Artifact, ArtifactId};
use crate::utils::{ensure_success, parse_timestamp};

use super::ArtifactSource;

const ARTIFACT_SERVICE: &str = "twirp/github.actions.results.api.v1.ArtifactService";

/// Twirp client for the artifact service of the results backend
pub struct ResultsClient {
    client: reqwest::Client,
    runtime: RuntimeConfig,
}

#[derive(Debug, Serialize)]
struct ListArtifactsRequest<'a> {
    workflow_run_backend_id: &'a str,
    workflow_job_run_backend_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name_filter: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ListArtifactsResponse {
    #[serde(default)]
    artifacts: Vec<ResultsArtifact>,
}

#[derive(Debug, Deserialize)]
struct ResultsArtifact {
    #[serde(alias = "databaseId", deserialize_with = "int64_lenient")]
    database_id: i64,
    name: String,
    #[serde(default, deserialize_with = "int64_lenient")]
    size: i64,
    #[serde(default, alias = "createdAt")]
    created_at: Option<String>,
    #[serde(default)]
    digest: Option<String>,
}

impl TryFrom<ResultsArtifact> for Artifact {
    type Error = Error;

    fn try_from(raw: ResultsArtifact) -> Result<Self> {
        let size = u64::try_from(raw.size).map_err(|_| {
            Error::Other(format!(
                "results service reported a negative size ({}) for artifact {}",
                raw.size, raw.database_id
            ))
        })?;
        Ok(Self {
            id: ArtifactId(raw.database_id),
            name: raw.name,
            size,
            created_at: parse_timestamp(raw.created_at.as_deref()),
            digest: raw.digest.filter(|d| !d.trim().is_empty()),
        })
    }
}

#[derive(Debug, Serialize)]
struct SignedUrlRequest<'a> {
    workflow_run_backend_id: &'a str,
    workflow_job_run_backend_id: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(alias = "signedUrl")]
    signed_url: String,
}

/// Accept an int64 encoded either as a JSON number or a decimal string
fn int64_lenient<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Number(i64),
        Text(String),
    }

    match Int64::deserialize(deserializer)? {
        Int64::Number(n) => Ok(n),
        Int64::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl ResultsClient {
    /// Create a client for the given runtime
    pub fn new(client: reqwest::Client, runtime: RuntimeConfig) -> Self {
        Self { client, runtime }
    }

    async fn call<Req, Resp>(&self, method: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!(
            "{}/{}/{}",
            self.runtime.results_url.trim_end_matches('/'),
            ARTIFACT_SERVICE,
            method
        );
        tracing::debug!(method, "calling results service");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.runtime.runtime_token)
            .json(body)
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// List artifacts of the current run, optionally filtered by exact name
    pub async fn list_artifacts(&self, name_filter: Option<&str>) -> Result<Vec<Artifact>> {
        let request = ListArtifactsRequest {
            workflow_run_backend_id: &self.runtime.workflow_run_backend_id,
            workflow_job_run_backend_id: &self.runtime.workflow_job_run_backend_id,
            name_filter,
        };
        let response: ListArtifactsResponse = self.call("ListArtifacts", &request).await?;
        response
            .artifacts
            .into_iter()
            .map(Artifact::try_from)
            .collect()
    }

    /// Obtain a short-lived download URL for the named artifact
    pub async fn signed_artifact_url(&self, name: &str) -> Result<url::Url> {
        let request = SignedUrlRequest {
            workflow_run_backend_id: &self.runtime.workflow_run_backend_id,
            workflow_job_run_backend_id: &self.runtime.workflow_job_run_backend_id,
            name,
        };
        let response: SignedUrlResponse = self.call("GetSignedArtifactURL", &request).await?;
        if response.signed_url.is_empty() {
            return Err(Error::Other(format!(
                "results service returned no download URL for artifact {name}"
            )));
        }
        url::Url::parse(&response.signed_url).map_err(|e| {
            Error::Other(format!(
                "results service returned an invalid download URL for artifact {name}: {e}"
            ))
        })
    }
}

/// [`ArtifactSource`] over the results service
pub struct RuntimeArtifactSource {
    results: std::sync::Arc<ResultsClient>,
}

impl RuntimeArtifactSource {
    /// Wrap a shared results client
    pub fn new(results: std::sync::Arc<ResultsClient>) -> Self {
        Self { results }
    }
}

#[async_trait::async_trait]
impl ArtifactSource for RuntimeArtifactSource {
    async fn list_artifacts(&self) -> Result<Vec<Artifact>> {
        self.results.list_artifacts(None).await
    }

    async fn get_artifact(&self, name: &str) -> Result<Artifact> {
        let matches = self.results.list_artifacts(Some(name)).await?;
        if matches.len() > 1 {
            tracing::debug!(
                name,
                count = matches.len(),
                "multiple artifacts share this name, using the most recent"
            );
        }
        matches
            .into_iter()
            .max_by_key(|a| a.id)
            .ok_or_else(|| Error::artifact_not_found(name))
    }
}
