//! End-to-end download flow: validate inputs, enumerate, select, download.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, DownloadInputs};
use crate::error::{Error, Result};
use crate::listing::{ArtifactLister, ResultsClient, RestPageFetcher, RuntimeArtifactSource};
use crate::selection::{SelectionMode, select_artifacts};
use crate::transfer::{
    ArtifactTransfer, DestinationLayout, HttpArtifactTransfer, download_artifacts,
};
use crate::types::{Artifact, DownloadSummary, RunQuery};
use crate::utils::{http_client, resolve_download_path};

/// Entry point for resolving and downloading the artifacts of a workflow run
///
/// Holds one shared HTTP client; every call to [`run`](Self::run) builds the listing and
/// transfer collaborators for the run it targets.
#[derive(Clone)]
pub struct ArtifactDownloader {
    config: Arc<Config>,
    client: reqwest::Client,
}

impl ArtifactDownloader {
    /// Create a downloader from configuration
    pub fn new(config: Config) -> Result<Self> {
        let client = http_client(&config)?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Configuration this downloader was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve, select and download artifacts according to `inputs`
    ///
    /// Every configuration error is raised before the first network call.
    pub async fn run(&self, inputs: &DownloadInputs) -> Result<DownloadSummary> {
        let mode = SelectionMode::from_inputs(inputs)?;
        let query = RunQuery::from_inputs(inputs)?;
        let root = resolve_download_path(inputs.path.as_deref(), &self.config.download_dir)?;

        let (lister, transfer) = self.collaborators(&query)?;

        if let RunQuery::Remote(run) = &query {
            tracing::info!(
                repository = %run.repository,
                run_id = run.run_id,
                "Downloading artifacts from another workflow run"
            );
        }

        tokio::fs::create_dir_all(&root).await?;
        download_selected(&lister, transfer.as_ref(), &mode, &root, inputs.merge_multiple).await
    }

    /// Enumerate the artifacts of a run without downloading anything
    pub async fn list_artifacts(&self, query: &RunQuery, latest: bool) -> Result<Vec<Artifact>> {
        let (lister, _) = self.collaborators(query)?;
        lister.list_artifacts(latest).await
    }

    fn collaborators(
        &self,
        query: &RunQuery,
    ) -> Result<(ArtifactLister, Box<dyn ArtifactTransfer>)> {
        match query {
            RunQuery::Current => {
                let runtime = self.config.runtime.clone().ok_or_else(|| {
                    Error::config(
                        "results service access is required for the current run",
                        "runtime",
                    )
                })?;
                let results = Arc::new(ResultsClient::new(self.client.clone(), runtime));
                let lister = ArtifactLister::Current(Arc::new(RuntimeArtifactSource::new(
                    results.clone(),
                )));
                let transfer = HttpArtifactTransfer::current(self.client.clone(), results);
                Ok((lister, Box::new(transfer)))
            }
            RunQuery::Remote(run) => {
                let fetcher =
                    RestPageFetcher::new(self.client.clone(), &self.config.api_url, run.clone())?;
                let transfer = HttpArtifactTransfer::remote(
                    self.client.clone(),
                    &self.config.api_url,
                    run.clone(),
                )?;
                Ok((ArtifactLister::Remote(Arc::new(fetcher)), Box::new(transfer)))
            }
        }
    }
}

/// Select from `lister` and download into `root` with the given collaborators
///
/// `root` is expected to exist already. Selection warnings and digest mismatches are
/// collected into the summary; resolution and transfer errors abort the run.
pub async fn download_selected(
    lister: &ArtifactLister,
    transfer: &dyn ArtifactTransfer,
    mode: &SelectionMode,
    root: &Path,
    merge_multiple: bool,
) -> Result<DownloadSummary> {
    let selection = select_artifacts(lister, mode).await?;
    let layout = DestinationLayout::new(
        PathBuf::from(root),
        mode,
        merge_multiple,
        selection.artifacts.len(),
    );

    tracing::debug!(
        selected = selection.artifacts.len(),
        flat = layout.is_flat(),
        root = %root.display(),
        "selection resolved"
    );

    let outcomes = download_artifacts(transfer, &selection.artifacts, &layout).await?;

    let mut warnings: Vec<String> = selection.warnings.iter().map(ToString::to_string).collect();
    warnings.extend(outcomes.iter().filter(|o| o.digest_mismatch).map(|o| {
        format!(
            "Artifact '{}' digest validation failed. Please verify the integrity of the artifact.",
            o.name
        )
    }));

    tracing::info!(
        downloaded = outcomes.len(),
        "Total of {} artifact(s) downloaded",
        outcomes.len()
    );
    tracing::info!(path = %root.display(), "Download artifact has finished successfully");

    Ok(DownloadSummary {
        download_path: root.to_path_buf(),
        downloaded: outcomes.len(),
        outcomes,
        warnings,
    })
}
