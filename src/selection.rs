//! Artifact selection: narrowing the enumerated run to the download set.
//!
//! Exactly one [`SelectionMode`] applies per invocation. Name and id list are mutually
//! exclusive; a glob pattern only applies when neither is given.

use std::collections::HashSet;

use crate::config::DownloadInputs;
use crate::error::{Error, ResolutionError, Result, join_ids};
use crate::listing::ArtifactLister;
use crate::types::{Artifact, ArtifactId, non_empty};

/// How the enumerated artifacts are narrowed down
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    /// A single artifact, looked up by exact name
    ByName(String),
    /// An explicit list of artifact ids
    ByIds(Vec<ArtifactId>),
    /// Every latest artifact whose name matches a glob pattern
    ByPattern(String),
    /// Every latest artifact of the run
    All,
}

impl SelectionMode {
    /// Determine the selection mode from the non-empty inputs
    ///
    /// Fails when both a name and an id list are given, or when the id list is malformed.
    pub fn from_inputs(inputs: &DownloadInputs) -> Result<Self> {
        let name = non_empty(inputs.name.as_deref());
        let ids = non_empty(inputs.artifact_ids.as_deref());

        match (name, ids) {
            (Some(_), Some(_)) => Err(Error::config(
                "inputs 'name' and 'artifact-ids' cannot be used together, specify only one",
                "artifact-ids",
            )),
            (Some(name), None) => Ok(Self::ByName(name.to_string())),
            (None, Some(raw)) => Ok(Self::ByIds(parse_artifact_ids(raw)?)),
            (None, None) => match non_empty(inputs.pattern.as_deref()) {
                Some(pattern) => Ok(Self::ByPattern(pattern.to_string())),
                None => Ok(Self::All),
            },
        }
    }

    /// Whether this mode names a single artifact
    pub fn is_single(&self) -> bool {
        matches!(self, Self::ByName(_))
    }
}

/// Parse a comma-separated id list, ignoring whitespace and empty entries
///
/// # Examples
///
/// ```
/// use artifact_dl::selection::parse_artifact_ids;
///
/// let ids = parse_artifact_ids(" 12, 34,,56 ").unwrap();
/// assert_eq!(ids.iter().map(|id| id.get()).collect::<Vec<_>>(), vec![12, 34, 56]);
/// assert!(parse_artifact_ids("12, abc").is_err());
/// assert!(parse_artifact_ids(" , ").is_err());
/// ```
pub fn parse_artifact_ids(raw: &str) -> Result<Vec<ArtifactId>> {
    let tokens: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err(Error::config(
            "no valid artifact ids provided in 'artifact-ids' input",
            "artifact-ids",
        ));
    }

    tokens
        .into_iter()
        .map(|token| {
            token.parse::<ArtifactId>().map_err(|_| {
                Error::config(
                    format!("invalid artifact id: '{token}', must be a number"),
                    "artifact-ids",
                )
            })
        })
        .collect()
}

/// Non-fatal condition raised while selecting
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionWarning {
    /// Some requested ids did not match any enumerated artifact
    MissingIds(Vec<ArtifactId>),
}

impl std::fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionWarning::MissingIds(ids) => {
                write!(f, "Could not find the following artifact IDs: {}", join_ids(ids))
            }
        }
    }
}

/// Final download set plus the diagnostics produced while resolving it
#[derive(Clone, Debug, Default)]
pub struct Selection {
    /// Selected artifacts, in enumeration order
    pub artifacts: Vec<Artifact>,
    /// Non-fatal warnings
    pub warnings: Vec<SelectionWarning>,
}

impl Selection {
    fn of(artifacts: Vec<Artifact>) -> Self {
        Self {
            artifacts,
            warnings: Vec::new(),
        }
    }
}

/// Resolve a selection mode against a run
pub async fn select_artifacts(lister: &ArtifactLister, mode: &SelectionMode) -> Result<Selection> {
    match mode {
        SelectionMode::ByName(name) => {
            tracing::info!(name = %name, "Downloading single artifact");
            let artifact = lister.get_artifact(name).await?;
            tracing::debug!(artifact_id = artifact.id.get(), name = %name, "found named artifact");
            Ok(Selection::of(vec![artifact]))
        }
        SelectionMode::ByIds(ids) => {
            tracing::info!(count = ids.len(), "Downloading artifacts by id");
            let artifacts = lister.list_artifacts(true).await?;
            select_by_ids(artifacts, ids)
        }
        SelectionMode::ByPattern(pattern) => {
            let artifacts = lister.list_artifacts(true).await?;
            Ok(Selection::of(select_by_pattern(artifacts, pattern)))
        }
        SelectionMode::All => {
            tracing::info!("No name, artifact-ids or pattern given, downloading all artifacts");
            Ok(Selection::of(lister.list_artifacts(true).await?))
        }
    }
}

/// Keep the artifacts whose id was requested
///
/// An empty intersection is fatal. Requested ids that were not found are reported as a
/// single warning, in request order.
pub fn select_by_ids(artifacts: Vec<Artifact>, requested: &[ArtifactId]) -> Result<Selection> {
    let wanted: HashSet<ArtifactId> = requested.iter().copied().collect();
    let found: Vec<Artifact> = artifacts
        .into_iter()
        .filter(|a| wanted.contains(&a.id))
        .collect();

    if found.is_empty() {
        return Err(ResolutionError::NoArtifactsForIds {
            requested: requested.to_vec(),
        }
        .into());
    }

    let found_ids: HashSet<ArtifactId> = found.iter().map(|a| a.id).collect();
    let mut seen = HashSet::new();
    let missing: Vec<ArtifactId> = requested
        .iter()
        .copied()
        .filter(|id| !found_ids.contains(id) && seen.insert(*id))
        .collect();

    let mut warnings = Vec::new();
    if !missing.is_empty() {
        let warning = SelectionWarning::MissingIds(missing);
        tracing::warn!("{warning}");
        warnings.push(warning);
    }

    tracing::debug!(found = found.len(), requested = requested.len(), "resolved artifact ids");
    Ok(Selection {
        artifacts: found,
        warnings,
    })
}

/// Keep the artifacts whose name matches a filename glob (`*`, `?`, `[...]`)
pub fn select_by_pattern(artifacts: Vec<Artifact>, pattern: &str) -> Vec<Artifact> {
    let before = artifacts.len();
    let matched: Vec<Artifact> = artifacts
        .into_iter()
        .filter(|a| glob_match::glob_match(pattern, &a.name))
        .collect();

    tracing::info!(
        pattern,
        before,
        after = matched.len(),
        "Filtered from {} to {} artifacts",
        before,
        matched.len()
    );
    matched
}
