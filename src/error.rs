use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DirdiffError>;

/// Failures of the comparison engine.
///
/// `EntryAccess`, `Symlink` and `SpecialFile` never leave the scanner: they are
/// logged and the entry is dropped from the tree. Everything else is surfaced to
/// the caller.
#[derive(Error, Debug)]
pub enum DirdiffError {
    /// Root path does not exist or cannot be read
    #[error("cannot open {path}: {source}")]
    RootAccess { path: PathBuf, source: io::Error },

    /// A child entry failed while walking
    #[error("cannot access entry {path}: {source}")]
    EntryAccess { path: PathBuf, source: io::Error },

    #[error("skipping symbolic link {path}")]
    Symlink { path: PathBuf },

    /// FIFOs, sockets and device files
    #[error("skipping special file {path}")]
    SpecialFile { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ContentRead { path: PathBuf, source: io::Error },

    #[error("cannot diff binary file {path}")]
    Binary { path: PathBuf },

    #[error("{path} is {size} bytes, over the {limit} byte text diff limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

impl DirdiffError {
    /// Entry-level failures the scanner recovers from.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DirdiffError::EntryAccess { .. }
                | DirdiffError::Symlink { .. }
                | DirdiffError::SpecialFile { .. }
        )
    }
}
