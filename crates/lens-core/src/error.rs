use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the watchlens pipeline.
#[derive(Error, Debug)]
pub enum LensError {
    /// The expected viewing-history export is not where we were told to look.
    #[error("Viewing-history file not found: {path}")]
    MissingInput { path: PathBuf },

    /// The CSV layer reported a structural problem.
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A chart could not be rendered or written.
    #[error("Failed to render chart: {0}")]
    Render(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the watchlens crates.
pub type Result<T> = std::result::Result<T, LensError>;
