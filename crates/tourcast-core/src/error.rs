//! Error types for Tourcast
//!
//! Computations never fail: data defects are logged and skipped. These
//! variants cover the fallible edges (config files, JSON input, roster edits).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Agency limit reached: at most {max} {kind} agencies")]
    RosterLimit { kind: String, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
