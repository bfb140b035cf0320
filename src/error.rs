//! Error types for the paging simulator.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

/// Configuration failures, reported before any simulation step runs.
#[derive(Error, Debug)]
pub enum SimError {
    /// Frame count below one
    #[error("invalid frame count {0}: at least one frame is required")]
    InvalidFrameCount(i64),

    #[error("unrecognized replacement policy: {0} (expected FIFO, LRU or Optimal)")]
    UnknownPolicy(String),

    /// Page count for generated references below one
    #[error("invalid page count {0}: at least one distinct page is required")]
    InvalidPageCount(i64),

    #[error("delimiter cannot be empty")]
    InvalidDelimiter,

    /// Input parsed to zero page tokens
    #[error("reference string cannot be empty")]
    EmptyReferenceString,

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
