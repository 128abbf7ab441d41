//! Correspondence tables mapping raw raster codes to coefficients.
//!
//! Tables are small (tens of entries), loaded once from `key=value` text
//! files before any evaluation starts, and shared read-only across all
//! parallel workers. Lookup is a linear first-match scan; table order is
//! preserved from the file.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

/// Errors raised while loading a correspondence table.
#[derive(Error, Debug)]
pub enum TableError {
    /// The table file could not be read.
    #[error("failed to read table {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// A line does not match the `key=value` pattern.
    #[error("{path}:{line}: malformed entry {text:?} (expected key=value)")]
    MissingDelimiter {
        path: String,
        line: usize,
        text: String,
    },

    /// A field could not be parsed as the table's declared numeric type.
    #[error("{path}:{line}: {field} {text:?} is not a valid {kind}")]
    InvalidNumber {
        path: String,
        line: usize,
        field: &'static str,
        text: String,
        kind: &'static str,
    },
}

#[derive(Clone, Copy)]
enum NumberKind {
    Int,
    Float,
}

impl NumberKind {
    fn name(self) -> &'static str {
        match self {
            Self::Int => "integer",
            Self::Float => "float",
        }
    }

    fn parse(self, text: &str) -> Option<f64> {
        match self {
            Self::Int => text.parse::<i64>().ok().map(|v| v as f64),
            Self::Float => text.parse::<f64>().ok(),
        }
    }
}

/// An ordered, immutable key → value table.
///
/// Both fields are stored as `f64` so integer-coded and float-coded tables
/// share one lookup path; raster samples are widened to `f64` before the
/// exact-equality comparison.
#[derive(Debug, Clone)]
pub struct CorrespondenceTable {
    entries: Vec<(f64, f64)>,
}

impl CorrespondenceTable {
    /// Load a table whose keys and values must parse as integers.
    pub fn load_int(path: impl AsRef<Path>) -> Result<Self, TableError> {
        Self::load(path.as_ref(), NumberKind::Int)
    }

    /// Load a table whose keys and values must parse as floats.
    pub fn load_float(path: impl AsRef<Path>) -> Result<Self, TableError> {
        Self::load(path.as_ref(), NumberKind::Float)
    }

    fn load(path: &Path, kind: NumberKind) -> Result<Self, TableError> {
        let display = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|source| TableError::Read {
            path: display.clone(),
            source,
        })?;

        let table = Self::parse(&contents, &display, kind)?;
        if table.is_empty() {
            warn!(path = %path.display(), "correspondence table is empty; every lookup will miss");
        }
        Ok(table)
    }

    fn parse(contents: &str, path: &str, kind: NumberKind) -> Result<Self, TableError> {
        let mut entries = Vec::new();

        for (index, raw_line) in contents.lines().enumerate() {
            let line = index + 1;
            let text = raw_line.trim();
            if text.is_empty() {
                continue;
            }

            let (key_text, value_text) =
                text.split_once('=')
                    .ok_or_else(|| TableError::MissingDelimiter {
                        path: path.to_string(),
                        line,
                        text: text.to_string(),
                    })?;

            let key = kind.parse(key_text.trim()).ok_or_else(|| {
                TableError::InvalidNumber {
                    path: path.to_string(),
                    line,
                    field: "key",
                    text: key_text.trim().to_string(),
                    kind: kind.name(),
                }
            })?;
            let value = kind.parse(value_text.trim()).ok_or_else(|| {
                TableError::InvalidNumber {
                    path: path.to_string(),
                    line,
                    field: "value",
                    text: value_text.trim().to_string(),
                    kind: kind.name(),
                }
            })?;

            entries.push((key, value));
        }

        Ok(Self { entries })
    }

    /// Build a table from in-memory pairs, preserving order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }

    /// First-match lookup by exact equality.
    ///
    /// A miss returns `None`; it is the caller's policy whether that keeps
    /// a default or aborts the run.
    pub fn lookup(&self, key: f32) -> Option<f64> {
        let key = f64::from(key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
