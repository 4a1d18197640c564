//! # artifact-dl
//!
//! Resolve the build artifacts of a CI workflow run and download them to local disk.
//!
//! ## Design Philosophy
//!
//! artifact-dl is designed to be:
//! - **Source-agnostic** - Same pipeline for the current run and for any other run
//! - **Bounded** - At most five downloads in flight, one chunk at a time
//! - **Library-first** - Inputs arrive already parsed; the host owns the process surface
//!
//! ## Quick Start
//!
//! ```no_run
//! use artifact_dl::{ArtifactDownloader, Config, DownloadInputs};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = ArtifactDownloader::new(Config::default())?;
//!
//!     let inputs = DownloadInputs {
//!         pattern: Some("dist-*".to_string()),
//!         merge_multiple: true,
//!         github_token: Some("ghp_example".to_string()),
//!         repository: Some("octo/app".to_string()),
//!         run_id: Some("123456".to_string()),
//!         ..Default::default()
//!     };
//!
//!     let summary = downloader.run(&inputs).await?;
//!     println!(
//!         "{} artifact(s) in {}",
//!         summary.downloaded,
//!         summary.download_path.display()
//!     );
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Artifact enumeration (paginated REST API and results service)
pub mod listing;
/// Top-level download flow
pub mod orchestrator;
/// Artifact selection by name, id list or pattern
pub mod selection;
/// Chunked download execution and the HTTP transfer
pub mod transfer;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::{Config, DownloadInputs, RuntimeConfig};
pub use error::{Error, ResolutionError, Result};
pub use listing::{ArtifactLister, ArtifactSource, PageFetcher};
pub use orchestrator::{ArtifactDownloader, download_selected};
pub use selection::{Selection, SelectionMode, SelectionWarning};
pub use transfer::{ArtifactTransfer, DOWNLOAD_CONCURRENCY, DestinationLayout};
pub use types::{
    Artifact, ArtifactId, DownloadOutcome, DownloadSummary, RemoteRun, Repository, RunQuery,
};
