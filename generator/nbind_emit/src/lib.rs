//! Output artifacts for generated bindings.
//!
//! An [`Artifact`] is one output file: a verbatim copy, a templated class,
//! or the mixed coder table. Artifacts are written to a [`Destination`],
//! independently of each other, so a batch can be emitted in parallel.

mod artifact;
mod class;
mod copied;
mod destination;
mod error;
mod mixed_coder;

use std::path::PathBuf;

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::debug;

pub use artifact::{Artifact, EmitOptions};
pub use class::{ClassBody, ClassHeader, ClassKind, GeneratedClassFile, SOURCE_EXTENSION};
pub use copied::CopiedFile;
pub use destination::{ArtifactTarget, Destination, FsDestination};
pub use error::EmitError;
pub use mixed_coder::{MixedPrimitiveCoderClassFile, MIXED_CODER_CLASS_NAME};

/// Write every artifact, returning the relative paths in input order.
///
/// Two artifacts with the same target are rejected before anything is
/// opened. On failure one of the errors is returned (the first one in
/// input order when `parallel` is off); artifacts already written stay
/// written.
#[tracing::instrument(level = "debug", skip_all, fields(artifacts = artifacts.len(), parallel = parallel))]
pub fn emit_all<D>(
    artifacts: &[Artifact],
    dest: &D,
    options: &EmitOptions,
    parallel: bool,
) -> Result<Vec<PathBuf>, EmitError>
where
    D: Destination + Sync,
{
    check_unique_targets(artifacts)?;

    let written: Result<Vec<_>, _> = if parallel {
        artifacts.par_iter().map(|a| a.write(dest, options)).collect()
    } else {
        artifacts.iter().map(|a| a.write(dest, options)).collect()
    };

    if let Ok(paths) = &written {
        debug!(count = paths.len(), "emitted artifacts");
    }
    written
}

fn check_unique_targets(artifacts: &[Artifact]) -> Result<(), EmitError> {
    let mut seen = FxHashSet::default();
    for artifact in artifacts {
        let path = artifact.target().relative_path();
        if !seen.insert(path.clone()) {
            return Err(EmitError::DuplicateTarget { path });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
