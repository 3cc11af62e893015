//! Error types for each pipeline stage.
//!
//! Fetch, persist and narration errors are fatal: `main` prints a diagnostic
//! and exits non-zero. [`UploadError`] is the only recoverable kind; the
//! narrator reports it and carries on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while retrieving or parsing an article.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid article URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("no title or article text found at {0}")]
    Empty(String),
}

/// Failure while writing article text to disk.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("could not resolve the working directory: {0}")]
    WorkingDir(#[source] io::Error),
    #[error("could not create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fatal failure inside the narrator (everything except the upload).
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("could not write audio file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reported-only failure of the object-storage upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("The file was not found.")]
    FileNotFound,
    #[error("AWS credentials not found. Configure them with `aws configure`.")]
    MissingCredentials,
    #[error("Upload failed: {0}")]
    Service(String),
}

/// Any fatal failure of a run, formatted as the line printed before exiting.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Error fetching or parsing article: {0}")]
    Fetch(#[from] FetchError),
    #[error("ERROR -- {0}")]
    Persist(#[from] PersistError),
    #[error("ERROR -- {0}")]
    Narration(#[from] NarrationError),
}
