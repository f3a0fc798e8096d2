//! Boundary to the managed-language type mapping.
//!
//! This crate decides *which* canonical types exist; what each one looks
//! like in the generated language is answered by a [`TargetResolver`]
//! supplied by the caller. Resolution is treated as a pure function, and the
//! answer is cached on the interned [`Type`], so a resolver runs at most once
//! per distinct canonical type.

use std::fmt;

use thiserror::Error;

use crate::canonical::Type;

/// What kind of managed-language construct a type maps to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Void,
    Primitive,
    Pointer,
    Struct,
    Union,
    Array,
    Object,
}

/// Handle for a canonical type's managed-language representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TargetType {
    /// Type name as written in generated source.
    pub name: String,
    pub kind: TargetKind,
    /// Expression naming the value coder for this type, when it has one.
    pub coder: Option<String>,
}

impl TargetType {
    pub fn new(name: impl Into<String>, kind: TargetKind) -> Self {
        TargetType {
            name: name.into(),
            kind,
            coder: None,
        }
    }

    #[must_use]
    pub fn with_coder(mut self, coder: impl Into<String>) -> Self {
        self.coder = Some(coder.into());
        self
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A canonical type the resolver has no mapping for.
///
/// Resolvers must be total over every type this crate can build, so this
/// is a configuration error, never something to retry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no target type for `{ty}`: {reason}")]
    Unresolvable { ty: String, reason: String },
}

impl ResolveError {
    pub fn unresolvable(ty: &Type, reason: impl Into<String>) -> Self {
        ResolveError::Unresolvable {
            ty: ty.to_string(),
            reason: reason.into(),
        }
    }
}

/// Maps canonical types to managed-language types.
pub trait TargetResolver {
    fn resolve(&self, ty: &Type) -> Result<TargetType, ResolveError>;
}

impl<F> TargetResolver for F
where
    F: Fn(&Type) -> Result<TargetType, ResolveError>,
{
    fn resolve(&self, ty: &Type) -> Result<TargetType, ResolveError> {
        self(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{NType, Primitive};

    #[test]
    fn closures_are_resolvers() {
        let resolver = |ty: &Type| -> Result<TargetType, ResolveError> {
            match ty.shape64().as_primitive() {
                Some(_) => Ok(TargetType::new("int", TargetKind::Primitive).with_coder("INT")),
                None => Err(ResolveError::unresolvable(ty, "not a primitive")),
            }
        };
        let int = Type::new(Some("int"), Primitive::Int.into(), None);
        assert_eq!(resolver.resolve(&int).unwrap().coder.as_deref(), Some("INT"));

        let void = Type::new(Some("void"), NType::Void, None);
        assert_eq!(
            resolver.resolve(&void).unwrap_err().to_string(),
            "no target type for `void (v / v)`: not a primitive"
        );
    }
}
