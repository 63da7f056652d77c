use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AegisError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Model response error: {0}")]
    Model(String),

    #[error("Malformed match record: {0}")]
    MalformedMatch(String),

    #[error("Time step must be at least 1 second")]
    InvalidStep,

    #[error("No rows produced from '{}' ({skipped} matches skipped)", raw_dir.display())]
    EmptyDataset { raw_dir: PathBuf, skipped: usize },
}

pub type Result<T> = std::result::Result<T, AegisError>;
