//! Artifact enumeration across the two run sources.
//!
//! Split into focused submodules:
//! - [`paginated`] - Public REST API, page-by-page
//! - [`runtime`] - Internal results service of the current run, single call
//!
//! [`ArtifactLister`] picks exactly one of them per query and applies the latest-only
//! reduction uniformly to whatever it returns.

pub mod paginated;
pub mod runtime;


use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{Artifact, ArtifactId};

pub use paginated::{ArtifactPage, PAGE_SIZE, PageFetcher, PageRequest, RestPageFetcher};
pub use runtime::{ResultsClient, RuntimeArtifactSource};

/// Single-call listing collaborator for the current run
#[async_trait::async_trait]
pub trait ArtifactSource: Send + Sync {
    /// List every artifact of the run
    async fn list_artifacts(&self) -> Result<Vec<Artifact>>;

    /// Look up one artifact by exact name
    ///
    /// Returns a not-found [`ResolutionError`](crate::error::ResolutionError) when absent.
    async fn get_artifact(&self, name: &str) -> Result<Artifact>;
}

/// Enumerates the artifacts of one run from exactly one source
#[derive(Clone)]
pub enum ArtifactLister {
    /// Current run, internal results service
    Current(Arc<dyn ArtifactSource>),
    /// Another run, public paginated REST API
    Remote(Arc<dyn PageFetcher>),
}

impl ArtifactLister {
    /// List the run's artifacts, optionally reduced to the latest upload per name
    ///
    /// An empty run yields an empty list, never an error.
    pub async fn list_artifacts(&self, latest: bool) -> Result<Vec<Artifact>> {
        let artifacts = dedup_by_id(match self {
            ArtifactLister::Current(source) => source.list_artifacts().await?,
            ArtifactLister::Remote(fetcher) => {
                paginated::fetch_all_pages(fetcher.as_ref(), None).await?
            }
        });

        tracing::info!(count = artifacts.len(), "Found {} artifact(s)", artifacts.len());

        if latest {
            Ok(filter_latest_artifacts(artifacts))
        } else {
            Ok(artifacts)
        }
    }

    /// Look up one artifact by exact name without enumerating the whole run
    ///
    /// When several uploads share the name, the most recent one wins.
    pub async fn get_artifact(&self, name: &str) -> Result<Artifact> {
        match self {
            ArtifactLister::Current(source) => source.get_artifact(name).await,
            ArtifactLister::Remote(fetcher) => {
                paginated::fetch_all_pages(fetcher.as_ref(), Some(name))
                    .await?
                    .into_iter()
                    .filter(|a| a.name == name)
                    .max_by_key(|a| a.id)
                    .ok_or_else(|| Error::artifact_not_found(name))
            }
        }
    }
}

/// Keep only the most recent artifact (greatest id) for each name
///
/// Survivors keep their enumeration order. Pure and deterministic, O(n log n).
pub fn filter_latest_artifacts(artifacts: Vec<Artifact>) -> Vec<Artifact> {
    let latest: HashSet<ArtifactId> = {
        let mut by_recency: Vec<&Artifact> = artifacts.iter().collect();
        by_recency.sort_by(|a, b| b.id.cmp(&a.id));

        let mut seen_names = HashSet::new();
        by_recency
            .into_iter()
            .filter(|a| seen_names.insert(a.name.as_str()))
            .map(|a| a.id)
            .collect()
    };

    let mut kept = HashSet::with_capacity(latest.len());
    artifacts
        .into_iter()
        .filter(|a| latest.contains(&a.id) && kept.insert(a.id))
        .collect()
}

/// Collapse repeated ids into one entry at the first position, last-seen metadata wins
pub(crate) fn dedup_by_id(artifacts: Vec<Artifact>) -> Vec<Artifact> {
    let mut positions: HashMap<ArtifactId, usize> = HashMap::with_capacity(artifacts.len());
    let mut unique: Vec<Artifact> = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        match positions.get(&artifact.id) {
            Some(&idx) => unique[idx] = artifact,
            None => {
                positions.insert(artifact.id, unique.len());
                unique.push(artifact);
            }
        }
    }

    unique
}
