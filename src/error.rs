// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeamError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("no parseable timestamp column in {path}")]
    MalformedFile { path: PathBuf },

    #[error("empty CSV file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("CSV error: {source} (path: {path})")]
    Csv { source: csv::Error, path: PathBuf },

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Generic error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SeamError>;

// Allow `?` on std::io::Error by converting to SeamError::Io with unknown path.
impl From<std::io::Error> for SeamError {
    fn from(source: std::io::Error) -> Self {
        SeamError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Gracefully convert WalkDir errors
impl From<walkdir::Error> for SeamError {
    fn from(e: walkdir::Error) -> Self {
        SeamError::Other(e.to_string())
    }
}
