//! Snapshot loading error types.

use std::path::PathBuf;

/// Errors from loading a network snapshot.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The snapshot file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON for the expected shape
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
