//! Utility functions for artifact-dl

use crate::config::Config;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Build the HTTP client shared by listing and transfer
pub(crate) fn http_client(config: &Config) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()?)
}

/// Turn a non-success response into [`Error::Api`], keeping the body as the message
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body
    };
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

/// Parse an RFC 3339 timestamp, returning `None` when absent or malformed
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(timestamp = raw, error = %e, "ignoring unparseable timestamp");
            None
        }
    }
}

/// Normalize a digest for comparison: strip the `sha256:` prefix and lowercase the hex
///
/// # Examples
///
/// ```
/// use artifact_dl::utils::normalize_digest;
///
/// assert_eq!(normalize_digest("sha256:ABCDEF"), "abcdef");
/// assert_eq!(normalize_digest(" abc "), "abc");
/// ```
pub fn normalize_digest(digest: &str) -> String {
    let digest = digest.trim();
    let hex = digest
        .strip_prefix("sha256:")
        .or_else(|| digest.strip_prefix("SHA256:"))
        .unwrap_or(digest);
    hex.to_ascii_lowercase()
}

/// Resolve the root output directory to an absolute path
///
/// A missing or empty `path` falls back to `default_dir`; relative paths are resolved
/// against the current working directory. The directory is not created here.
pub fn resolve_download_path(path: Option<&Path>, default_dir: &Path) -> Result<PathBuf> {
    let chosen = match path {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => default_dir,
    };
    if chosen.is_absolute() {
        return Ok(chosen.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    Ok(normalize_relative(&cwd.join(chosen)))
}

/// Drop `.` components so logged paths read cleanly
fn normalize_relative(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}
