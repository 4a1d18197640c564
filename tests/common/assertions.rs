//! File-system assertions for extracted artifacts

use std::path::Path;

/// Assert that `path` exists and holds exactly `expected`
pub fn assert_file_contents(path: &Path, expected: &[u8]) {
    let actual = std::fs::read(path)
        .unwrap_or_else(|e| panic!("expected file {} to exist: {e}", path.display()));
    assert_eq!(
        actual,
        expected,
        "unexpected contents in {}",
        path.display()
    );
}

/// Names of the direct children of `dir`, sorted
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", dir.display()))
        .map(|entry| {
            entry
                .expect("read dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
