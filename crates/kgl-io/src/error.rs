//! I/O-adapter error kinds.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("invalid JSON input: {0}")]
    InvalidJsonInput(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("filesystem error: {0}")]
    Fs(#[from] std::io::Error),

    #[error("graph store error: {0}")]
    Store(#[from] kgl_core::KglError),
}
