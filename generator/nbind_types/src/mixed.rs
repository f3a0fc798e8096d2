//! Mixed-encoding descriptors.
//!
//! Some native typedefs are one primitive on the 32-bit ABI and another on
//! the 64-bit ABI (`NSInteger` is `i` / `q`). Their bindings need a coder
//! that picks the right encoding at runtime. Every distinct
//! (32-bit, 64-bit) primitive pair gets one named, statically initialized
//! coder field, shared by all types with that pair.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::canonical::Type;
use crate::descriptor::Primitive;

/// Source-level naming for mixed coder fields.
pub trait CoderNaming {
    /// Field name for the pair, e.g. `SINT_SLONGLONG`.
    fn field_name(&self, p32: Primitive, p64: Primitive) -> String;

    /// Initializer expression for the field.
    fn definition(&self, p32: Primitive, p64: Primitive) -> String;
}

/// A group of canonical types sharing one mixed primitive encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MixedEncodingDescriptor {
    encodings: (Primitive, Primitive),
    types: Vec<Arc<Type>>,
    mixed_name: String,
    definition: String,
}

impl MixedEncodingDescriptor {
    pub fn new(
        encodings: (Primitive, Primitive),
        mixed_name: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        MixedEncodingDescriptor {
            encodings,
            types: Vec::new(),
            mixed_name: mixed_name.into(),
            definition: definition.into(),
        }
    }

    /// The (32-bit, 64-bit) primitive pair.
    pub fn encodings(&self) -> (Primitive, Primitive) {
        self.encodings
    }

    /// Types using this coder, in first-seen order.
    pub fn types(&self) -> &[Arc<Type>] {
        &self.types
    }

    /// Generated field name.
    pub fn mixed_name(&self) -> &str {
        &self.mixed_name
    }

    /// Initializer expression for the generated field.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn push(&mut self, ty: Arc<Type>) {
        self.types.push(ty);
    }
}

/// Group types whose two shapes are differing primitives.
///
/// Groups appear in the order their first member appears in `types`, so
/// the same input always yields the same sequence.
pub fn group_mixed_encodings<'a, I, N>(types: I, naming: &N) -> Vec<MixedEncodingDescriptor>
where
    I: IntoIterator<Item = &'a Arc<Type>>,
    N: CoderNaming + ?Sized,
{
    let mut groups: Vec<MixedEncodingDescriptor> = Vec::new();
    let mut index: FxHashMap<(Primitive, Primitive), usize> = FxHashMap::default();
    for ty in types {
        let Some((p32, p64)) = ty.mixed_primitives() else {
            continue;
        };
        let slot = *index.entry((p32, p64)).or_insert_with(|| {
            groups.push(MixedEncodingDescriptor::new(
                (p32, p64),
                naming.field_name(p32, p64),
                naming.definition(p32, p64),
            ));
            groups.len() - 1
        });
        groups[slot].push(Arc::clone(ty));
    }
    tracing::debug!(groups = groups.len(), "grouped mixed encodings");
    groups
}
