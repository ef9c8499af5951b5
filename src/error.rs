//! Error types
//!
//! Physics ticks never fail; these cover configuration, construction and
//! position-feed I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Problems reading or validating a settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Lattice construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LatticeError {
    #[error("lattice needs at least one row and one column (got {rows}x{columns})")]
    EmptyDimension { rows: usize, columns: usize },
}

/// Position feed errors
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed feed line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
