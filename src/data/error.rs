//! Dataset error types
//!
//! Errors raised while loading the static datasets at startup.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or assembling a dataset
#[derive(Error, Debug)]
pub enum DataError {
    /// Dataset file could not be read
    #[error("Failed to read dataset file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dataset file is not valid JSON for its table
    #[error("Failed to parse dataset file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Tables parsed but violate a structural rule
    #[error("Malformed dataset: {0}")]
    Malformed(String),
}

/// Result type alias for dataset operations
pub type DataResult<T> = Result<T, DataError>;
