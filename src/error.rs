use std::path::PathBuf;

use thiserror::Error;

/// Failures at the preferences storage boundary. Callers log and carry on.
#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PrefsError>;
