//! Payload hashing and zip extraction for downloaded artifacts.

use std::fs::File;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::utils::normalize_digest;

/// Downloaded archive spooled to an anonymous temp file, plus its SHA-256
///
/// The file is removed by the OS once the last handle is dropped.
pub(crate) struct Payload {
    pub(crate) file: File,
    pub(crate) size: u64,
    pub(crate) sha256: String,
}

/// Stream the response body to a temp file, hashing it as it arrives
///
/// A body shorter than its declared length surfaces as a network error.
pub(crate) async fn read_payload(mut response: reqwest::Response) -> Result<Payload> {
    let file = tempfile::tempfile()?;
    let mut writer = tokio::fs::File::from_std(file.try_clone()?);
    let mut hasher = Sha256::new();
    let mut size = 0u64;

    while let Some(chunk) = response.chunk().await? {
        hasher.update(&chunk);
        writer.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }
    writer.flush().await?;

    Ok(Payload {
        file,
        size,
        sha256: format!("{:x}", hasher.finalize()),
    })
}

/// Compare an expected digest (optionally `sha256:`-prefixed) with a computed hex digest
pub(crate) fn digest_matches(expected: &str, actual_hex: &str) -> bool {
    normalize_digest(expected) == normalize_digest(actual_hex)
}

/// Extract a zip archive from `file` into `dest`, returning the number of files written
pub(crate) async fn extract_zip(file: File, dest: PathBuf) -> Result<usize> {
    tokio::task::spawn_blocking(move || extract_zip_blocking(file, &dest))
        .await
        .map_err(|e| Error::Other(format!("extraction task failed: {e}")))?
}

fn extract_zip_blocking(file: File, dest: &Path) -> Result<usize> {
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| Error::Archive(format!("failed to open zip archive: {e}")))?;

    std::fs::create_dir_all(dest)?;
    let mut written = 0;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::Archive(format!("failed to read zip entry {index}: {e}")))?;

        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            warn!(entry = entry.name(), "skipping entry with unsafe path");
            continue;
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&target)?;
        std::io::copy(&mut entry, &mut outfile)?;
        written += 1;
    }

    debug!(files = written, dest = %dest.display(), "extracted artifact archive");
    Ok(written)
}
