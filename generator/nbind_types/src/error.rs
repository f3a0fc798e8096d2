//! Error types for merging and constructing canonical types.

use thiserror::Error;

use crate::descriptor::{AbiWidth, DescriptorTag, Primitive};

/// Why two descriptors of the same ABI width could not be reconciled.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MergeConflict {
    #[error("{left} cannot merge with {right}")]
    TagMismatch {
        left: DescriptorTag,
        right: DescriptorTag,
    },
    #[error("member count differs ({left} vs {right})")]
    ArityMismatch { left: usize, right: usize },
    #[error("primitive `{}` conflicts with `{}`", .left.encoding(), .right.encoding())]
    PrimitiveMismatch { left: Primitive, right: Primitive },
    #[error("array length differs ({left} vs {right})")]
    ArrayLengthMismatch { left: u32, right: u32 },
}

/// Structural merge failure.
///
/// `left` and `right` are the encodings of the innermost pair that
/// failed, which for nested shapes is narrower than the operands passed in.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot merge `{left}` with `{right}`: {conflict}")]
pub struct MergeFailed {
    pub left: String,
    pub right: String,
    pub conflict: MergeConflict,
}

/// A per-name merge failed on one ABI axis.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("conflicting {width} declarations of `{name}`")]
pub struct TypeMergeError {
    pub name: String,
    pub width: AbiWidth,
    #[source]
    pub source: MergeFailed,
}

/// A structurally required descriptor was absent.
///
/// Only the name of a type may legitimately be missing; a missing shape
/// means the scanner (or a caller) broke its contract.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("type `{}` has no 32-bit descriptor", .name.as_deref().unwrap_or("<anonymous>"))]
    MissingShape32 { name: Option<String> },
}
