//! Structural merging of same-width descriptors.
//!
//! Two declaration sites may describe the same declared type with slightly
//! different shapes (one names struct members, the other doesn't; one names
//! the struct tag, the other is anonymous). [`merge_descriptors`] reconciles
//! them or reports exactly where they disagree. Nothing is ever widened or
//! coerced: a primitive conflict is a failure here, and only the per-name
//! override table one level up can paper over it.

use std::sync::Arc;

use crate::descriptor::{Composite, Member, NType};
use crate::error::{MergeConflict, MergeFailed};
use crate::stack::ensure_sufficient_stack;

/// Merge two descriptors of the same ABI width.
///
/// - equal descriptors merge to themselves
/// - pointers merge their pointees
/// - structs (and unions) with the same member count merge member-wise by
///   position; member names come from `a`, the tag name is the first
///   present one
/// - arrays of equal length merge their elements
/// - anything else fails
pub fn merge_descriptors(a: &NType, b: &NType) -> Result<NType, MergeFailed> {
    ensure_sufficient_stack(|| {
        if a == b {
            return Ok(a.clone());
        }
        match (a, b) {
            (NType::Pointer(x), NType::Pointer(y)) => Ok(NType::Pointer(Box::new(merge_descriptors(x, y)?))),
            (NType::Struct(x), NType::Struct(y)) => Ok(NType::Struct(merge_composites(a, b, x, y)?)),
            (NType::Union(x), NType::Union(y)) => Ok(NType::Union(merge_composites(a, b, x, y)?)),
            (
                NType::Array {
                    len: left,
                    element: x,
                },
                NType::Array {
                    len: right,
                    element: y,
                },
            ) => {
                if left != right {
                    return Err(failed(
                        a,
                        b,
                        MergeConflict::ArrayLengthMismatch {
                            left: *left,
                            right: *right,
                        },
                    ));
                }
                Ok(NType::Array {
                    len: *left,
                    element: Box::new(merge_descriptors(x, y)?),
                })
            }
            (NType::Primitive(left), NType::Primitive(right)) => Err(failed(
                a,
                b,
                MergeConflict::PrimitiveMismatch {
                    left: *left,
                    right: *right,
                },
            )),
            _ => Err(failed(
                a,
                b,
                MergeConflict::TagMismatch {
                    left: a.tag(),
                    right: b.tag(),
                },
            )),
        }
    })
}

/// Merge shared descriptors, reusing `a`'s allocation when nothing changes.
pub fn merge_shared(a: &Arc<NType>, b: &Arc<NType>) -> Result<Arc<NType>, MergeFailed> {
    if Arc::ptr_eq(a, b) || a == b {
        return Ok(Arc::clone(a));
    }
    merge_descriptors(a, b).map(Arc::new)
}

fn merge_composites(a: &NType, b: &NType, x: &Composite, y: &Composite) -> Result<Composite, MergeFailed> {
    if x.members.len() != y.members.len() {
        return Err(failed(
            a,
            b,
            MergeConflict::ArityMismatch {
                left: x.members.len(),
                right: y.members.len(),
            },
        ));
    }
    let members = x
        .members
        .iter()
        .zip(&y.members)
        .map(|(mx, my)| {
            Ok(Member {
                name: mx.name.clone(),
                ty: merge_descriptors(&mx.ty, &my.ty)?,
            })
        })
        .collect::<Result<Vec<_>, MergeFailed>>()?;
    Ok(Composite {
        name: x.name.clone().or_else(|| y.name.clone()),
        members,
    })
}

fn failed(a: &NType, b: &NType, conflict: MergeConflict) -> MergeFailed {
    MergeFailed {
        left: a.to_string(),
        right: b.to_string(),
        conflict,
    }
}

#[cfg(test)]
mod tests;
