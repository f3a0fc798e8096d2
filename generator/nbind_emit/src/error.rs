//! Emission errors.
//!
//! Every variant is fatal. Generation is deterministic, so retrying would
//! hit the same failure; the sink is still closed before the error returns.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("cannot open `{}` for writing", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed writing `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read copy source `{}`", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("two artifacts target `{}`", .path.display())]
    DuplicateTarget { path: PathBuf },
}

impl EmitError {
    /// The file the error is about.
    pub fn path(&self) -> &PathBuf {
        match self {
            EmitError::Open { path, .. }
            | EmitError::Write { path, .. }
            | EmitError::SourceUnreadable { path, .. }
            | EmitError::DuplicateTarget { path } => path,
        }
    }
}
