//! Canonical type model for native binding generation.
//!
//! The scanner reports a descriptor per declaration site and per ABI width.
//! This crate turns those observations into one canonical [`Type`] per
//! declared name:
//!
//! ```text
//! NType observations (per site, per ABI)
//!        ↓
//!   merge_descriptors   (same-width structural merge)
//!        ↓
//!   TypeMerger::merge   (per-name policy, overrides, audit trail)
//!        ↓
//!   TypeRegistry        (interning: one Arc per distinct type)
//!        ↓
//!   TargetResolver      (managed-language type, cached per type)
//! ```
//!
//! Emission of source files lives in `nbind_emit`.

mod canonical;
mod descriptor;
pub mod encoding;
mod error;
mod merge;
mod mixed;
mod overrides;
mod registry;
mod stack;
mod target;

pub use canonical::{clean_name, merge_name, NameCollision, Type, TypeMerger};
pub use descriptor::{AbiWidth, Composite, DescriptorTag, Member, NType, Primitive};
pub use encoding::{parse_encoding, DescriptorParseError, ParseErrorKind};
pub use error::{InvariantViolation, MergeConflict, MergeFailed, TypeMergeError};
pub use merge::{merge_descriptors, merge_shared};
pub use mixed::{group_mixed_encodings, CoderNaming, MixedEncodingDescriptor};
pub use overrides::{MergeOverride, MergeOverrides, OverrideRule};
pub use registry::{FrozenRegistry, SharedTypeRegistry, TypeRegistry, VOID_NAME, VOID_PTR_NAME};
pub use target::{ResolveError, TargetKind, TargetResolver, TargetType};
