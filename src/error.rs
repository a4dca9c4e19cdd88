//! Error type for network persistence and analysis

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while saving, loading or analysing a network
#[derive(Debug, Error)]
pub enum NetworkError {
    /// None of the persisted artifacts exist
    #[error("no persisted graph for `{name}` (searched {})", display_paths(.searched))]
    NotFound {
        /// Logical network name
        name: String,
        /// Artifact paths that were tried, in preference order
        searched: Vec<PathBuf>,
    },

    /// The graph directory could not be created (parent missing, permissions)
    #[error("failed to create graph directory {}", .path.display())]
    CreateDir {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing an artifact failed
    #[error("I/O error on {}", .path.display())]
    Io {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The GML text could not be parsed
    #[error("malformed GML at line {line}: {message}")]
    Gml {
        /// 1-based line number of the offending token
        line: usize,
        /// What went wrong
        message: String,
    },

    /// An attribute key cannot be written as a GML key
    #[error("attribute key `{0}` is not a valid GML key")]
    InvalidKey(String),

    /// The binary snapshot could not be written or decoded
    #[error("binary snapshot {} failed", .path.display())]
    Snapshot {
        /// Snapshot path
        path: PathBuf,
        /// Codec error with context
        #[source]
        source: anyhow::Error,
    },

    /// The format policy is empty, so nothing can be saved
    #[error("no output formats configured for `{0}`")]
    NoFormats(String),

    /// GeoJSON export failed
    #[error("GeoJSON export failed")]
    Json(#[from] serde_json::Error),

    /// Tabular export failed
    #[error("CSV export failed")]
    Csv(#[from] csv::Error),
}

impl NetworkError {
    /// Create a GML parse error
    pub fn gml(line: usize, message: impl Into<String>) -> Self {
        Self::Gml {
            line,
            message: message.into(),
        }
    }

    /// Whether this is the "nothing persisted" error
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result alias defaulting to [`NetworkError`]
pub type Result<T, E = NetworkError> = std::result::Result<T, E>;
