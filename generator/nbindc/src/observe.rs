//! From scanner observations to canonical types.
//!
//! ```text
//! observations ── group by name, then site (first-seen order)
//!              ── same-width merge per site      (merge_descriptors)
//!              ── one site Type per site         (Type::try_new)
//!              ── fold site Types per name       (TypeMerger::merge)
//!              ── intern                         (TypeRegistry)
//! ```
//!
//! Failures are collected per name; other names keep going so one run
//! reports every conflict.

use std::sync::Arc;

use nbind_types::{
    clean_name, merge_descriptors, parse_encoding, AbiWidth, NType, Type, TypeMergeError, TypeMerger, TypeRegistry,
};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::TypeError;
use crate::manifest::Observation;

/// Grouping key. Anonymous declarations never merge across sites.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum NameKey {
    Named(String),
    Anonymous { site: String },
}

impl NameKey {
    fn name(&self) -> Option<&str> {
        match self {
            NameKey::Named(name) => Some(name.as_str()),
            NameKey::Anonymous { .. } => None,
        }
    }

    fn label(&self) -> String {
        match self {
            NameKey::Named(name) => name.clone(),
            NameKey::Anonymous { site } => format!("<anonymous>@{site}"),
        }
    }
}

/// Descriptors seen at one site, merged per width.
#[derive(Debug)]
struct SiteShapes {
    site: String,
    shape32: Option<NType>,
    shape64: Option<NType>,
}

impl SiteShapes {
    fn slot(&mut self, width: AbiWidth) -> &mut Option<NType> {
        match width {
            AbiWidth::Bits32 => &mut self.shape32,
            AbiWidth::Bits64 => &mut self.shape64,
        }
    }
}

#[derive(Debug)]
struct NameGroup {
    key: NameKey,
    sites: Vec<SiteShapes>,
    failed: bool,
}

/// Canonical types produced from one manifest.
#[derive(Debug, Default)]
pub struct Canonicalized {
    /// One interned type per declared name, first-seen order.
    pub types: Vec<Arc<Type>>,
    pub errors: Vec<TypeError>,
}

/// Group, merge and intern `observations`.
///
/// Observations with an out-of-range ABI are skipped; the manifest loader
/// rejects them first.
#[tracing::instrument(level = "debug", skip_all, fields(observations = observations.len()))]
pub fn canonicalize(observations: &[Observation], merger: &mut TypeMerger, registry: &mut TypeRegistry) -> Canonicalized {
    let mut out = Canonicalized::default();
    let mut groups = group_observations(observations, &mut out.errors);

    for group in &mut groups {
        if group.failed {
            continue;
        }
        match fold_group(group, merger) {
            Ok(Some(ty)) => {
                let canonical = registry.intern_shared(ty);
                trace!(ty = %canonical, "canonical type");
                out.types.push(canonical);
            }
            Ok(None) => {}
            Err(error) => out.errors.push(error),
        }
    }

    debug!(types = out.types.len(), errors = out.errors.len(), "canonicalized observations");
    out
}

fn group_observations(observations: &[Observation], errors: &mut Vec<TypeError>) -> Vec<NameGroup> {
    let mut groups: Vec<NameGroup> = Vec::new();
    let mut index: FxHashMap<NameKey, usize> = FxHashMap::default();

    for obs in observations {
        let Some(width) = AbiWidth::from_bits(obs.abi) else {
            continue;
        };
        let key = match obs.name.as_deref().map(clean_name) {
            Some(name) if !name.is_empty() => NameKey::Named(name),
            _ => NameKey::Anonymous { site: obs.site.clone() },
        };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(NameGroup {
                key,
                sites: Vec::new(),
                failed: false,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];

        let shape = match parse_encoding(&obs.encoding) {
            Ok(shape) => shape,
            Err(source) => {
                group.failed = true;
                errors.push(TypeError::Parse {
                    name: group.key.label(),
                    site: obs.site.clone(),
                    width,
                    encoding: obs.encoding.clone(),
                    source,
                });
                continue;
            }
        };

        let site = match group.sites.iter().position(|s| s.site == obs.site) {
            Some(i) => &mut group.sites[i],
            None => {
                group.sites.push(SiteShapes {
                    site: obs.site.clone(),
                    shape32: None,
                    shape64: None,
                });
                let last = group.sites.len() - 1;
                &mut group.sites[last]
            }
        };

        let slot = site.slot(width);
        let merged = match slot.take() {
            None => Ok(shape),
            Some(prev) => merge_descriptors(&prev, &shape),
        };
        match merged {
            Ok(shape) => *slot = Some(shape),
            Err(source) => {
                group.failed = true;
                errors.push(
                    TypeMergeError {
                        name: group.key.label(),
                        width,
                        source,
                    }
                    .into(),
                );
            }
        }
    }
    groups
}

fn fold_group(group: &mut NameGroup, merger: &mut TypeMerger) -> Result<Option<Arc<Type>>, TypeError> {
    let name = group.key.name();
    let mut acc: Option<Arc<Type>> = None;
    for site in &mut group.sites {
        let site_type = Type::try_new(name, site.shape32.take(), site.shape64.take())?;
        trace!(site = %site.site, ty = %site_type, "site type");
        acc = merger.merge(acc, Some(Arc::new(site_type)))?;
    }
    Ok(acc)
}
