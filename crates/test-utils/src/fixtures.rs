//! Filesystem fixtures for tests.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Create a scratch directory that is removed when dropped.
pub fn scratch_dir() -> TempDir {
    tempfile::tempdir().expect("create scratch dir")
}

/// Write a `key=value` correspondence-table file into `dir` and return its
/// path.
pub fn write_table_file(dir: &Path, name: &str, pairs: &[(f64, f64)]) -> PathBuf {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).expect("create table fixture");
    for (key, value) in pairs {
        writeln!(file, "{}={}", key, value).expect("write table fixture");
    }
    path
}
