//! Canonical types and the per-name merge policy.
//!
//! A [`Type`] is the one deduplicated answer for a declared native name:
//! its (cleaned) name plus a descriptor per ABI width. Types are built by
//! the scanner boundary or by [`TypeMerger::merge`], then interned in a
//! [`crate::TypeRegistry`] so that structurally equal types share one
//! instance.
//!
//! # Single-width collapse
//!
//! When the 64-bit shape is absent or equal to the 32-bit shape, both
//! fields hold the same `Arc`. [`Type::is_single_width`] is then a pointer
//! comparison.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::descriptor::{AbiWidth, NType, Primitive};
use crate::error::{InvariantViolation, TypeMergeError};
use crate::merge::merge_shared;
use crate::overrides::{MergeOverrides, OverrideRule};
use crate::target::{ResolveError, TargetResolver, TargetType};

/// Stand-in for a missing name in displays and error reports.
const ANONYMOUS: &str = "<anonymous>";

/// Remove every whitespace run from a declared name.
///
/// Headers spell the same name with incidental whitespace
/// (`id <NSCopying, NSObject>` vs `id<NSCopying,NSObject>`).
pub fn clean_name(name: &str) -> String {
    name.split_whitespace().collect()
}

/// A canonical native type.
#[derive(Clone)]
pub struct Type {
    name: Option<String>,
    shape32: Arc<NType>,
    shape64: Arc<NType>,
    /// Cached display string.
    display: OnceLock<String>,
    /// Cached resolver answer.
    target: OnceLock<TargetType>,
}

impl Type {
    /// Build a type from owned descriptors.
    pub fn new(name: Option<&str>, shape32: NType, shape64: Option<NType>) -> Self {
        Self::from_shared(name, Arc::new(shape32), shape64.map(Arc::new))
    }

    /// Build a type from shared descriptors, collapsing equal shapes.
    pub fn from_shared(name: Option<&str>, shape32: Arc<NType>, shape64: Option<Arc<NType>>) -> Self {
        let shape64 = match shape64 {
            Some(s64) if !Arc::ptr_eq(&s64, &shape32) && *s64 != *shape32 => s64,
            _ => Arc::clone(&shape32),
        };
        Type {
            name: name.map(clean_name),
            shape32,
            shape64,
            display: OnceLock::new(),
            target: OnceLock::new(),
        }
    }

    /// Scanner-boundary constructor: the 32-bit shape must be present.
    pub fn try_new(
        name: Option<&str>,
        shape32: Option<NType>,
        shape64: Option<NType>,
    ) -> Result<Self, InvariantViolation> {
        match shape32 {
            Some(shape32) => Ok(Self::new(name, shape32, shape64)),
            None => Err(InvariantViolation::MissingShape32 {
                name: name.map(clean_name),
            }),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn shape32(&self) -> &Arc<NType> {
        &self.shape32
    }

    pub fn shape64(&self) -> &Arc<NType> {
        &self.shape64
    }

    pub fn shape(&self, width: AbiWidth) -> &Arc<NType> {
        match width {
            AbiWidth::Bits32 => &self.shape32,
            AbiWidth::Bits64 => &self.shape64,
        }
    }

    /// Both ABIs share one descriptor.
    #[inline]
    pub fn is_single_width(&self) -> bool {
        Arc::ptr_eq(&self.shape32, &self.shape64)
    }

    /// The primitive pair when both shapes are primitives that disagree,
    /// e.g. `NSInteger` (`i` / `q`).
    pub fn mixed_primitives(&self) -> Option<(Primitive, Primitive)> {
        if self.is_single_width() {
            return None;
        }
        let p32 = self.shape32.as_primitive()?;
        let p64 = self.shape64.as_primitive()?;
        (p32 != p64).then_some((p32, p64))
    }

    /// `name (enc32 / enc64)`, computed once.
    pub fn display(&self) -> &str {
        self.display.get_or_init(|| {
            format!(
                "{} ({} / {})",
                self.name.as_deref().unwrap_or(ANONYMOUS),
                self.shape32,
                self.shape64
            )
        })
    }

    /// Managed-language type for this type, resolved at most once.
    ///
    /// Call this on the interned instance (see
    /// [`crate::TypeRegistry::target_type`]) so the cache is shared by
    /// every reference to the type.
    pub fn target_type<R>(&self, resolver: &R) -> Result<&TargetType, ResolveError>
    where
        R: TargetResolver + ?Sized,
    {
        if let Some(target) = self.target.get() {
            return Ok(target);
        }
        let resolved = resolver.resolve(self)?;
        Ok(self.target.get_or_init(|| resolved))
    }

    /// The cached target type, if it has been resolved.
    pub fn cached_target(&self) -> Option<&TargetType> {
        self.target.get()
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && (Arc::ptr_eq(&self.shape32, &other.shape32) || self.shape32 == other.shape32)
            && (Arc::ptr_eq(&self.shape64, &other.shape64) || self.shape64 == other.shape64)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.shape32.hash(state);
        self.shape64.hash(state);
    }
}

/// Ordered by display string; used for deterministic output only.
impl Ord for Type {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display()
            .cmp(other.display())
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Type {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name)
            .field("shape32", &format_args!("{}", self.shape32))
            .field("shape64", &format_args!("{}", self.shape64))
            .finish_non_exhaustive()
    }
}

/// Two differently named types merged into one.
///
/// Not an error; kept so a human can audit false equivalences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameCollision {
    pub left: Arc<Type>,
    pub right: Arc<Type>,
    pub merged: Arc<Type>,
}

/// Reconcile the types seen for one declared name at different sites.
pub fn merge_name<'a>(a: Option<&'a str>, b: Option<&'a str>) -> Option<&'a str> {
    a.or(b)
}

/// Per-name merge policy with its override table and audit trail.
#[derive(Debug)]
pub struct TypeMerger {
    overrides: MergeOverrides,
    collisions: Vec<NameCollision>,
}

impl Default for TypeMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMerger {
    /// A merger with the built-in override table.
    pub fn new() -> Self {
        Self::with_overrides(MergeOverrides::builtin())
    }

    pub fn with_overrides(overrides: MergeOverrides) -> Self {
        TypeMerger {
            overrides,
            collisions: Vec::new(),
        }
    }

    /// Name collisions recorded so far, in merge order.
    pub fn collisions(&self) -> &[NameCollision] {
        &self.collisions
    }

    /// Merge two types observed for the same declared name.
    ///
    /// An absent operand yields the other one unchanged, as does an equal
    /// pair. Overridden names keep `a`. Otherwise the name is reconciled
    /// (first present wins) and each ABI axis is merged structurally. The
    /// result is a fresh, not yet interned type.
    pub fn merge(
        &mut self,
        a: Option<Arc<Type>>,
        b: Option<Arc<Type>>,
    ) -> Result<Option<Arc<Type>>, TypeMergeError> {
        let (a, b) = match (a, b) {
            (None, other) | (other, None) => return Ok(other),
            (Some(a), Some(b)) => (a, b),
        };
        if Arc::ptr_eq(&a, &b) || a == b {
            return Ok(Some(a));
        }
        if let Some(OverrideRule::KeepFirst) = self.overrides.rule_for(a.name()) {
            tracing::debug!(left = %a, right = %b, "override keeps first type");
            return Ok(Some(a));
        }

        let collides = matches!((a.name(), b.name()), (Some(x), Some(y)) if x != y);
        let name = merge_name(a.name(), b.name());
        let failed = |width, source| TypeMergeError {
            name: name.unwrap_or(ANONYMOUS).to_owned(),
            width,
            source,
        };
        let shape32 = merge_shared(a.shape32(), b.shape32()).map_err(|source| failed(AbiWidth::Bits32, source))?;
        let shape64 = merge_shared(a.shape64(), b.shape64()).map_err(|source| failed(AbiWidth::Bits64, source))?;
        let merged = Arc::new(Type::from_shared(name, shape32, Some(shape64)));

        if collides {
            tracing::info!(
                target: "nbind::merge",
                left = %a,
                right = %b,
                merged = %merged,
                "merged types with different names"
            );
            self.collisions.push(NameCollision {
                left: a,
                right: b,
                merged: Arc::clone(&merged),
            });
        }
        Ok(Some(merged))
    }
}

#[cfg(test)]
mod tests;
