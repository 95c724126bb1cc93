//! error types for the parts of the editor that can actually fail.
//! erasing itself never does.

use std::path::PathBuf;

use thiserror::Error;

use crate::stroke::StrokeId;

/// errors while loading or saving [`crate::config::SketchConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// errors when a layer is asked about a stroke it does not hold
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayerError {
    #[error("stroke {0:?} is not on this layer")]
    StrokeNotFound(StrokeId),

    #[error("erase action was already finalized")]
    AlreadyFinalized,

    #[error("erase action has not been finalized")]
    NotFinalized,
}
