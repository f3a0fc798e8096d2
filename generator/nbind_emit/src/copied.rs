//! Verbatim copies of hand-written runtime sources.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::destination::ArtifactTarget;
use crate::error::EmitError;

const COPY_BUF_SIZE: usize = 8 * 1024;

/// Copies `source` byte for byte to its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopiedFile {
    target: ArtifactTarget,
    source: PathBuf,
}

impl CopiedFile {
    pub fn new(source: impl Into<PathBuf>, package: impl Into<String>, file_name: impl Into<String>) -> Self {
        CopiedFile {
            target: ArtifactTarget::new(package, file_name),
            source: source.into(),
        }
    }

    pub fn target(&self) -> &ArtifactTarget {
        &self.target
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Stream the source into `out`. Read and write failures are reported
    /// separately so the error names the right file.
    pub(crate) fn write_body(&self, out: &mut dyn Write, dest_path: &Path) -> Result<(), EmitError> {
        let unreadable = |source| EmitError::SourceUnreadable {
            path: self.source.clone(),
            source,
        };
        let mut input = File::open(&self.source).map_err(unreadable)?;
        let mut buf = [0u8; COPY_BUF_SIZE];
        loop {
            let n = match input.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(unreadable(e)),
            };
            out.write_all(&buf[..n]).map_err(|source| EmitError::Write {
                path: dest_path.to_path_buf(),
                source,
            })?;
        }
    }
}
