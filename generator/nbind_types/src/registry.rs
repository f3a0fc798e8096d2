//! Canonical type registry (interning pool).
//!
//! The registry guarantees at most one live [`Type`] instance per distinct
//! (name, shape32, shape64) triple. Every caller that interns an equal type
//! gets the same `Arc` back, so downstream code may use `Arc::ptr_eq` as a
//! distinctness test, and the lazily cached fields on a type are computed
//! once for the whole run.
//!
//! # Lifecycle
//!
//! Created at pipeline start (with `void` and `void*` pre-registered),
//! mutated while scan results are merged, then [`TypeRegistry::freeze`]d
//! before emission. Concurrent scanners go through [`SharedTypeRegistry`],
//! which serializes inserts.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use rustc_hash::FxHashSet;

use crate::canonical::Type;
use crate::descriptor::NType;
use crate::target::{ResolveError, TargetResolver, TargetType};

/// Name of the pre-registered `void` type.
pub const VOID_NAME: &str = "void";
/// Name of the pre-registered `void*` type.
pub const VOID_PTR_NAME: &str = "void*";

/// Deduplicating pool of canonical types.
#[derive(Debug)]
pub struct TypeRegistry {
    /// Lookup by structural key.
    types: FxHashSet<Arc<Type>>,
    /// Insertion order, for deterministic walks.
    order: Vec<Arc<Type>>,
    void: Arc<Type>,
    void_ptr: Arc<Type>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry with the `void` and `void*` sentinels.
    pub fn new() -> Self {
        let void = Arc::new(Type::new(Some(VOID_NAME), NType::Void, None));
        let void_ptr = Arc::new(Type::new(Some(VOID_PTR_NAME), NType::pointer(NType::Void), None));
        let mut registry = TypeRegistry {
            types: FxHashSet::default(),
            order: Vec::with_capacity(256),
            void: Arc::clone(&void),
            void_ptr: Arc::clone(&void_ptr),
        };
        registry.insert(void);
        registry.insert(void_ptr);
        registry
    }

    /// The `void` sentinel.
    pub fn void(&self) -> &Arc<Type> {
        &self.void
    }

    /// The `void*` sentinel.
    pub fn void_ptr(&self) -> &Arc<Type> {
        &self.void_ptr
    }

    /// Return the pooled instance equal to `candidate`, inserting it first
    /// if there is none.
    pub fn intern(&mut self, candidate: Type) -> Arc<Type> {
        if let Some(existing) = self.types.get(&candidate) {
            return Arc::clone(existing);
        }
        self.insert(Arc::new(candidate))
    }

    /// Like [`TypeRegistry::intern`], but keeps `candidate`'s allocation
    /// when it becomes the pooled instance.
    pub fn intern_shared(&mut self, candidate: Arc<Type>) -> Arc<Type> {
        if let Some(existing) = self.types.get(candidate.as_ref()) {
            return Arc::clone(existing);
        }
        self.insert(candidate)
    }

    fn insert(&mut self, ty: Arc<Type>) -> Arc<Type> {
        tracing::trace!(ty = %ty, "interned");
        self.types.insert(Arc::clone(&ty));
        self.order.push(Arc::clone(&ty));
        ty
    }

    /// The pooled instance equal to `ty`, if any.
    pub fn get(&self, ty: &Type) -> Option<&Arc<Type>> {
        self.types.get(ty)
    }

    /// Whether `ty` is the pooled instance itself (not merely equal to it).
    pub fn is_interned(&self, ty: &Arc<Type>) -> bool {
        self.types.get(ty.as_ref()).is_some_and(|pooled| Arc::ptr_eq(pooled, ty))
    }

    /// Resolve `ty`'s target type through its pooled instance.
    ///
    /// Interns `ty` first if needed, so the resolver runs at most once per
    /// distinct type no matter how many equal copies callers hold.
    pub fn target_type<R>(&mut self, ty: &Arc<Type>, resolver: &R) -> Result<TargetType, ResolveError>
    where
        R: TargetResolver + ?Sized,
    {
        let canonical = self.intern_shared(Arc::clone(ty));
        canonical.target_type(resolver).cloned()
    }

    /// Resolve every pooled type. Returns how many were resolved.
    #[tracing::instrument(level = "debug", skip_all, fields(count = self.order.len()))]
    pub fn resolve_all<R>(&self, resolver: &R) -> Result<usize, ResolveError>
    where
        R: TargetResolver + ?Sized,
    {
        for ty in &self.order {
            ty.target_type(resolver)?;
        }
        Ok(self.order.len())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Pooled types in insertion order (sentinels first).
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Type>> {
        self.order.iter()
    }

    /// Stop accepting inserts; emission only reads.
    pub fn freeze(self) -> FrozenRegistry {
        tracing::debug!(count = self.order.len(), "registry frozen");
        FrozenRegistry {
            order: self.order,
            void: self.void,
            void_ptr: self.void_ptr,
        }
    }
}

/// Read-only view of a finished registry.
#[derive(Clone, Debug)]
pub struct FrozenRegistry {
    order: Vec<Arc<Type>>,
    void: Arc<Type>,
    void_ptr: Arc<Type>,
}

impl FrozenRegistry {
    pub fn void(&self) -> &Arc<Type> {
        &self.void
    }

    pub fn void_ptr(&self) -> &Arc<Type> {
        &self.void_ptr
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Types in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Type>> {
        self.order.iter()
    }

    /// Types ordered by display string, for stable generated output.
    pub fn sorted(&self) -> Vec<Arc<Type>> {
        let mut types = self.order.clone();
        types.sort();
        types
    }
}

/// A registry shared between concurrent scanners.
///
/// Lookups take the read lock; inserts take the write lock and re-check,
/// so two scanners interning equal types still end up with one instance.
#[derive(Clone, Debug, Default)]
pub struct SharedTypeRegistry(Arc<RwLock<TypeRegistry>>);

impl SharedTypeRegistry {
    pub fn new(registry: TypeRegistry) -> Self {
        SharedTypeRegistry(Arc::new(RwLock::new(registry)))
    }

    pub fn intern(&self, candidate: Type) -> Arc<Type> {
        {
            let guard = self.0.read();
            if let Some(existing) = guard.get(&candidate) {
                return Arc::clone(existing);
            }
        }
        // `intern` re-checks under the write lock.
        self.0.write().intern(candidate)
    }

    pub fn intern_shared(&self, candidate: Arc<Type>) -> Arc<Type> {
        {
            let guard = self.0.read();
            if let Some(existing) = guard.get(&candidate) {
                return Arc::clone(existing);
            }
        }
        self.0.write().intern_shared(candidate)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.0.read()
    }

    /// Take the registry back once every other handle is gone.
    pub fn try_into_inner(self) -> Result<TypeRegistry, Self> {
        Arc::try_unwrap(self.0)
            .map(RwLock::into_inner)
            .map_err(SharedTypeRegistry)
    }
}
