//! Locating reference data for tests.
//!
//! Reference data (GPM granules, the flight segment catalog) is too large
//! for the repository. Point `TEST_DATA_DIR` at a directory holding it, or
//! place it in a crate's `testdata/` folder.

use std::path::{Path, PathBuf};

/// Crates whose `testdata/` folder is searched, in order.
const TESTDATA_CRATES: &[&str] = &["gpm-l1c", "flight-meta", "readers"];

/// Directory containing the workspace `Cargo.toml`.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/test-utils -> crates -> root
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

/// `crates/{crate_name}/testdata/`.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root().join("crates").join(crate_name).join("testdata")
}

/// Every directory searched by [`find_test_file`], `TEST_DATA_DIR` first
/// and the workspace-level `testdata/` last.
pub fn testdata_search_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = std::env::var_os("TEST_DATA_DIR")
        .map(PathBuf::from)
        .into_iter()
        .collect();
    dirs.extend(TESTDATA_CRATES.iter().map(|name| crate_testdata_dir(name)));
    dirs.push(workspace_root().join("testdata"));
    dirs
}

/// First existing file or directory called `name` in the search dirs.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    testdata_search_dirs()
        .into_iter()
        .map(|dir| dir.join(name))
        .find(|path| path.exists())
}

/// Scratch directory for a test, removed on drop.
pub fn scratch_dir(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create scratch directory")
}
