//! Zip archives and REST listing payloads for integration tests

use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};

/// Build an in-memory zip archive from `(path, content)` pairs
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, zip::write::FileOptions::default())
            .expect("start zip entry");
        writer.write_all(content).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// `sha256:`-prefixed digest of `bytes`, as the REST API reports it
pub fn sha256_digest(bytes: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(bytes))
}

/// One artifact entry of a REST listing page
pub fn artifact_json(id: i64, name: &str, archive: &[u8]) -> Value {
    json!({
        "id": id,
        "name": name,
        "size_in_bytes": archive.len(),
        "created_at": "2024-05-01T10:00:00Z",
        "digest": sha256_digest(archive),
    })
}

/// A REST listing page carrying `total_count`
pub fn listing_page(total_count: usize, artifacts: Vec<Value>) -> Value {
    json!({
        "total_count": total_count,
        "artifacts": artifacts,
    })
}
