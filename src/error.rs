//! Error types for the photo organizer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for photo organizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the photo organizer
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source is not a directory: {}", .path.display())]
    SourceNotDirectory { path: PathBuf },

    #[error("File has no name component: {}", .path.display())]
    InvalidFileName { path: PathBuf },

    #[error("Failed to move {} to {} after {applied} successful moves: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        applied: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Destination collision at {} after {applied} successful moves: {} planned source(s), existing file: {existing}", .destination.display(), .sources.len())]
    DestinationCollision {
        destination: PathBuf,
        sources: Vec<PathBuf>,
        existing: bool,
        applied: usize,
    },
}

impl Error {
    /// Number of moves that completed before this error, if it came from applying a plan
    pub fn applied(&self) -> Option<usize> {
        match self {
            Error::Move { applied, .. } | Error::DestinationCollision { applied, .. } => {
                Some(*applied)
            }
            _ => None,
        }
    }
}
