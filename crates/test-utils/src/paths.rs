//! Path utilities for locating and writing test data files.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// Determined from the test-utils manifest directory (`crates/test-utils`).
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Searches for a test file in multiple locations.
///
/// This function checks the following locations in order:
/// 1. Environment variable `TEST_DATA_DIR` (if set)
/// 2. `crates/netcdf-parser/testdata/`
/// 3. `testdata/` at the workspace root
///
/// Real granules are large and not checked in; tests that need one should
/// use [`require_test_file!`](crate::require_test_file).
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }

    let root = workspace_root();
    candidates.extend([
        root.join("crates/netcdf-parser/testdata").join(name),
        root.join("testdata").join(name),
    ]);

    candidates.into_iter().find(|path| path.exists())
}

/// Path of the CF standard-name table bundled with the CLI.
pub fn bundled_cf_table() -> PathBuf {
    workspace_root()
        .join("services/ummvar-gen/resources")
        .join("cf-standard-name-table.xml")
}

/// Creates a temporary directory for test output.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("ummvar_test_")
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_bundled_cf_table_exists() {
        assert!(bundled_cf_table().exists());
    }

    #[test]
    fn test_write_fixture() {
        let dir = temp_test_dir();
        let path = write_fixture(dir.path(), "header.cdl", "netcdf x {\n}\n");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "netcdf x {\n}\n");
    }
}
