//! One generation run, start to finish.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use nbind_emit::{emit_all, Destination, EmitOptions, FsDestination};
use nbind_types::{TypeMerger, TypeRegistry};
use tracing::{error, info};

use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::manifest::Manifest;
use crate::observe::canonicalize;
use crate::resolve::DefaultResolver;
use crate::wrappers::build_artifacts;

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Canonical types in the frozen registry, sentinels included.
    pub types: usize,
    /// Merges that reconciled two different names.
    ///
    /// Observations are grouped by cleaned name before they reach the
    /// merger, so a manifest run always reports 0 here. Differently named
    /// types only meet when a caller drives `TypeMerger` directly.
    pub collisions: usize,
    /// Relative paths written, in emission order.
    pub artifacts: Vec<PathBuf>,
}

impl fmt::Display for GenerateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} canonical types, {} name collisions, {} files written",
            self.types,
            self.collisions,
            self.artifacts.len()
        )
    }
}

/// Load the manifest named by `config` and generate into `config.out_dir`.
#[tracing::instrument(level = "info", skip_all, fields(manifest = %config.manifest.display()))]
pub fn generate(config: &GeneratorConfig) -> Result<GenerateSummary, GenerateError> {
    let manifest = Manifest::load(&config.manifest)?;
    let base_dir = config.manifest.parent().unwrap_or_else(|| Path::new(""));

    let options = match &config.header {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| GenerateError::Header {
                path: path.clone(),
                source,
            })?;
            EmitOptions::default().with_header(text)
        }
        None => EmitOptions::default(),
    };

    generate_into(&manifest, base_dir, config, &options, &FsDestination::new(&config.out_dir))
}

/// Run the pipeline on a loaded manifest, writing to `dest`.
///
/// Relative copy sources are resolved against `base_dir`.
pub fn generate_into<D>(
    manifest: &Manifest,
    base_dir: &Path,
    config: &GeneratorConfig,
    options: &EmitOptions,
    dest: &D,
) -> Result<GenerateSummary, GenerateError>
where
    D: Destination + Sync,
{
    let mut registry = TypeRegistry::new();
    let mut merger = TypeMerger::new();

    let canon = canonicalize(&manifest.observations, &mut merger, &mut registry);
    if !canon.errors.is_empty() {
        for err in &canon.errors {
            error!(%err, "type rejected");
        }
        return Err(GenerateError::Types(canon.errors));
    }

    let resolver = DefaultResolver::new(&config.runtime_package, manifest.package());
    registry.resolve_all(&resolver)?;

    let collisions = merger.collisions().len();
    let registry = registry.freeze();

    let artifacts = build_artifacts(&registry, manifest, base_dir, &config.runtime_package, resolver.naming())?;
    let written = emit_all(&artifacts, dest, options, config.parallel)?;

    let summary = GenerateSummary {
        types: registry.len(),
        collisions,
        artifacts: written,
    };
    info!(%summary, "generation finished");
    Ok(summary)
}

#[cfg(test)]
mod tests;
