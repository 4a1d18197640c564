//! Public REST listing: one page per request, driven until the run is exhausted.

use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::error::Result;
use crate::types::{Artifact, ArtifactId, RemoteRun};
use crate::utils::{ensure_success, parse_timestamp};

/// Records requested per page
pub const PAGE_SIZE: u32 = 100;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// Parameters for a single page request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest<'a> {
    /// 1-based page number
    pub page: u32,
    /// Records per page
    pub per_page: u32,
    /// Restrict the listing to artifacts with this exact name
    pub name: Option<&'a str>,
}

/// One page of normalized artifacts
#[derive(Clone, Debug, Default)]
pub struct ArtifactPage {
    /// Total number of artifacts the server reports for the run, if it reports one
    pub total_count: Option<u64>,
    /// Normalized records of this page, in server order
    pub artifacts: Vec<Artifact>,
}

/// Fetches one page of artifact metadata for a run
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch and normalize the requested page
    async fn fetch_page(&self, request: PageRequest<'_>) -> Result<ArtifactPage>;
}

/// Fetch pages 1, 2, ... sequentially and concatenate them in fetch order.
///
/// Stops after a short page or once the running total reaches the reported total count,
/// whichever is observed first. No page cap: a server that always returns full pages and
/// never reports a total keeps this loop going.
pub(crate) async fn fetch_all_pages(
    fetcher: &dyn PageFetcher,
    name: Option<&str>,
) -> Result<Vec<Artifact>> {
    let mut artifacts: Vec<Artifact> = Vec::new();
    let mut page = 1;

    loop {
        let ArtifactPage {
            total_count,
            artifacts: records,
        } = fetcher
            .fetch_page(PageRequest {
                page,
                per_page: PAGE_SIZE,
                name,
            })
            .await?;

        let received = records.len();
        artifacts.extend(records);

        tracing::debug!(
            page,
            received,
            fetched = artifacts.len(),
            total_count = ?total_count,
            "fetched artifact page"
        );

        if received < PAGE_SIZE as usize {
            break;
        }
        if let Some(total) = total_count
            && artifacts.len() as u64 >= total
        {
            break;
        }
        page += 1;
    }

    Ok(super::dedup_by_id(artifacts))
}

/// Raw artifact record as returned by the REST API
#[derive(Debug, Deserialize)]
struct RawArtifact {
    id: i64,
    name: String,
    size_in_bytes: u64,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    digest: Option<String>,
}

impl From<RawArtifact> for Artifact {
    fn from(raw: RawArtifact) -> Self {
        Self {
            id: ArtifactId(raw.id),
            name: raw.name,
            size: raw.size_in_bytes,
            created_at: parse_timestamp(raw.created_at.as_deref()),
            digest: raw.digest.filter(|d| !d.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListArtifactsResponse {
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    artifacts: Vec<RawArtifact>,
}

/// [`PageFetcher`] backed by the public REST API
///
/// Lists `GET {api_url}/repos/{owner}/{repo}/actions/runs/{run_id}/artifacts`.
pub struct RestPageFetcher {
    client: reqwest::Client,
    api_url: String,
    run: RemoteRun,
}

impl RestPageFetcher {
    /// Create a fetcher for a remote run, validating its token and run id
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        run: RemoteRun,
    ) -> Result<Self> {
        run.validate()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            run,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/repos/{}/{}/actions/runs/{}/artifacts",
            self.api_url.trim_end_matches('/'),
            self.run.repository.owner,
            self.run.repository.repo,
            self.run.run_id
        )
    }
}

#[async_trait::async_trait]
impl PageFetcher for RestPageFetcher {
    async fn fetch_page(&self, request: PageRequest<'_>) -> Result<ArtifactPage> {
        let mut query = vec![
            ("per_page", request.per_page.to_string()),
            ("page", request.page.to_string()),
        ];
        if let Some(name) = request.name {
            query.push(("name", name.to_string()));
        }

        let response = self
            .client
            .get(self.endpoint())
            .bearer_auth(&self.run.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .query(&query)
            .send()
            .await?;
        let body: ListArtifactsResponse = ensure_success(response).await?.json().await?;

        Ok(ArtifactPage {
            total_count: body.total_count,
            artifacts: body.artifacts.into_iter().map(Artifact::from).collect(),
        })
    }
}
