//! Driver errors.

use nbind_emit::EmitError;
use nbind_types::{AbiWidth, DescriptorParseError, InvariantViolation, ResolveError, TypeMergeError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::manifest::ManifestError;

/// Why one declared name could not become a canonical type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("`{name}` at `{site}` ({width}): bad encoding `{encoding}`")]
    Parse {
        name: String,
        site: String,
        width: AbiWidth,
        encoding: String,
        #[source]
        source: DescriptorParseError,
    },
    #[error(transparent)]
    Merge(#[from] TypeMergeError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// A failed generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("cannot read header file `{}`", .path.display())]
    Header {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Every name that failed, in first-seen order.
    #[error("{} declared type(s) could not be merged", .0.len())]
    Types(Vec<TypeError>),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl GenerateError {
    /// Per-type failures, empty for other kinds.
    pub fn type_errors(&self) -> &[TypeError] {
        match self {
            GenerateError::Types(errors) => errors,
            _ => &[],
        }
    }
}
