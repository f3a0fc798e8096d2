//! Where artifacts are written.
//!
//! A [`Destination`] maps an artifact's relative path to a writable sink.
//! Sinks are closed by dropping them, which happens on every exit path of
//! [`crate::Artifact::write`], including write failures.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Package-qualified file location of an artifact.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactTarget {
    pub package: String,
    pub file_name: String,
}

impl ArtifactTarget {
    pub fn new(package: impl Into<String>, file_name: impl Into<String>) -> Self {
        ArtifactTarget {
            package: package.into(),
            file_name: file_name.into(),
        }
    }

    /// `com.example.foo` + `Bar.java` → `com/example/foo/Bar.java`.
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.package.split('.').filter(|s| !s.is_empty()).collect();
        path.push(&self.file_name);
        path
    }
}

/// Opens sinks for relative artifact paths.
pub trait Destination {
    type Sink: Write;

    fn open(&self, relative: &Path) -> io::Result<Self::Sink>;
}

/// Writes artifacts below a root directory, creating package directories.
#[derive(Clone, Debug)]
pub struct FsDestination {
    root: PathBuf,
}

impl FsDestination {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsDestination { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Destination for FsDestination {
    type Sink = BufWriter<File>;

    fn open(&self, relative: &Path) -> io::Result<Self::Sink> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(BufWriter::new(File::create(path)?))
    }
}
