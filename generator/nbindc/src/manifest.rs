//! The scan manifest.
//!
//! The scanner writes one JSON document per run:
//!
//! ```json
//! {
//!   "package": "com.example.foundation",
//!   "observations": [
//!     { "name": "NSInteger", "site": "NSObjCRuntime.h:12", "abi": 32, "encoding": "i" },
//!     { "name": "NSInteger", "site": "NSObjCRuntime.h:12", "abi": 64, "encoding": "q" }
//!   ],
//!   "copies": [
//!     { "source": "runtime/Pointer.java", "package": "org.nbind.runtime" }
//!   ]
//! }
//! ```
//!
//! Observations are kept in file order; that order decides first-seen
//! tie-breaks downstream.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Package for generated wrappers when the manifest names none.
pub const DEFAULT_PACKAGE: &str = "nbind.generated";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub observations: Vec<Observation>,
    #[serde(default)]
    pub copies: Vec<CopyEntry>,
}

/// One declaration site on one ABI.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Observation {
    #[serde(default)]
    pub name: Option<String>,
    pub site: String,
    /// `32` or `64`.
    pub abi: u32,
    /// Native type encoding, e.g. `{CGPoint=dd}`.
    pub encoding: String,
}

/// A runtime source copied verbatim into the output tree.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyEntry {
    /// Relative paths are resolved against the manifest's directory.
    pub source: PathBuf,
    pub package: String,
    /// Defaults to the source's file name.
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed manifest `{}`", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("observation {index} (`{site}`): ABI width must be 32 or 64, got {abi}")]
    BadAbi { index: usize, site: String, abi: u32 },
    #[error("copy of `{}` has no file name", .path.display())]
    MissingFileName { path: PathBuf },
}

impl Manifest {
    /// Read and validate a manifest file.
    #[tracing::instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse manifest text; `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_str(text).map_err(|source| ManifestError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        manifest.validate()?;
        tracing::debug!(
            observations = manifest.observations.len(),
            copies = manifest.copies.len(),
            "manifest loaded"
        );
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), ManifestError> {
        for (index, obs) in self.observations.iter().enumerate() {
            if nbind_types::AbiWidth::from_bits(obs.abi).is_none() {
                return Err(ManifestError::BadAbi {
                    index,
                    site: obs.site.clone(),
                    abi: obs.abi,
                });
            }
        }
        for copy in &self.copies {
            copy.target_file_name()?;
        }
        Ok(())
    }

    /// Package for generated wrapper classes.
    pub fn package(&self) -> &str {
        self.package.as_deref().unwrap_or(DEFAULT_PACKAGE)
    }
}

impl CopyEntry {
    pub fn target_file_name(&self) -> Result<String, ManifestError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ManifestError::MissingFileName {
                path: self.source.clone(),
            })
    }

    /// Source path resolved against `base`.
    pub fn resolved_source(&self, base: &Path) -> PathBuf {
        if self.source.is_absolute() {
            self.source.clone()
        } else {
            base.join(&self.source)
        }
    }
}
