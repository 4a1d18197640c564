//! Bounded download dispatch: consecutive chunks, each fully joined before the next.

use std::path::{Component, Path, PathBuf};

use futures::future::join_all;

use crate::error::{Error, Result};
use crate::selection::SelectionMode;
use crate::types::{Artifact, DownloadOutcome};

use super::{ArtifactTransfer, DownloadRequest};

/// Maximum number of downloads in flight
pub const DOWNLOAD_CONCURRENCY: usize = 5;

/// Decides where each selected artifact is extracted
///
/// Artifacts land directly in the root when the selection names a single artifact, when
/// the caller asked to merge, or when only one artifact was selected. Otherwise each goes
/// to `root/<name>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestinationLayout {
    root: PathBuf,
    flatten: bool,
}

impl DestinationLayout {
    /// Layout for a resolved selection
    pub fn new(
        root: impl Into<PathBuf>,
        mode: &SelectionMode,
        merge_multiple: bool,
        selected: usize,
    ) -> Self {
        Self {
            root: root.into(),
            flatten: mode.is_single() || merge_multiple || selected == 1,
        }
    }

    /// Root output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether every artifact is written into the root itself
    pub fn is_flat(&self) -> bool {
        self.flatten
    }

    /// Destination directory for one artifact
    ///
    /// Outside a flat layout the name becomes a directory under the root, so it must be a
    /// single plain path component.
    pub fn path_for(&self, artifact: &Artifact) -> Result<PathBuf> {
        if self.flatten {
            return Ok(self.root.clone());
        }

        let mut components = Path::new(&artifact.name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.root.join(name)),
            _ => Err(Error::Other(format!(
                "artifact name '{}' cannot be used as a directory name",
                artifact.name
            ))),
        }
    }
}

/// Download the selection with at most [`DOWNLOAD_CONCURRENCY`] transfers in flight
///
/// Outcomes are returned in selection order. A digest mismatch is only a warning; a
/// transfer error fails the run once its chunk has settled.
pub async fn download_artifacts(
    transfer: &dyn ArtifactTransfer,
    artifacts: &[Artifact],
    layout: &DestinationLayout,
) -> Result<Vec<DownloadOutcome>> {
    download_in_chunks(transfer, artifacts, layout, DOWNLOAD_CONCURRENCY).await
}

pub(crate) async fn download_in_chunks(
    transfer: &dyn ArtifactTransfer,
    artifacts: &[Artifact],
    layout: &DestinationLayout,
    width: usize,
) -> Result<Vec<DownloadOutcome>> {
    let mut outcomes = Vec::with_capacity(artifacts.len());

    for (index, chunk) in artifacts.chunks(width.max(1)).enumerate() {
        tracing::debug!(chunk = index + 1, size = chunk.len(), "dispatching download chunk");

        let results = join_all(
            chunk
                .iter()
                .map(|artifact| download_one(transfer, artifact, layout)),
        )
        .await;

        for result in results {
            outcomes.push(result?);
        }
    }

    Ok(outcomes)
}

async fn download_one(
    transfer: &dyn ArtifactTransfer,
    artifact: &Artifact,
    layout: &DestinationLayout,
) -> Result<DownloadOutcome> {
    let path = layout.path_for(artifact).inspect_err(|e| {
        tracing::error!(
            artifact_id = artifact.id.get(),
            error = %e,
            "Refusing to download artifact"
        );
    })?;
    tracing::info!(
        artifact_id = artifact.id.get(),
        name = %artifact.name,
        path = %path.display(),
        "Downloading artifact"
    );

    let request = DownloadRequest {
        name: artifact.name.clone(),
        path: path.clone(),
        expected_hash: artifact.digest.clone(),
    };
    let outcome = transfer
        .download_artifact(artifact.id, request)
        .await
        .inspect_err(|e| {
            tracing::error!(
                artifact_id = artifact.id.get(),
                name = %artifact.name,
                error = %e,
                "Artifact download failed"
            );
        })?;

    if outcome.digest_mismatch {
        tracing::warn!(
            artifact_id = artifact.id.get(),
            name = %artifact.name,
            "Artifact '{}' digest validation failed. Please verify the integrity of the artifact.",
            artifact.name
        );
    }

    Ok(DownloadOutcome {
        artifact_id: artifact.id,
        name: artifact.name.clone(),
        path,
        digest_mismatch: outcome.digest_mismatch,
    })
}
