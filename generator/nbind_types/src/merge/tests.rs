use super::*;
use crate::descriptor::{DescriptorTag, Primitive};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn enc(s: &str) -> NType {
    match s.parse() {
        Ok(ty) => ty,
        Err(e) => panic!("bad encoding `{s}`: {e}"),
    }
}

#[test]
fn equal_descriptors_merge_to_themselves() {
    let point = enc("{CGPoint=dd}");
    assert_eq!(merge_descriptors(&point, &point), Ok(point));
}

#[test]
fn pointer_merges_pointee() {
    let named = enc("^{CGPoint=\"x\"d\"y\"d}");
    let bare = enc("^{?=dd}");
    let merged = merge_descriptors(&named, &bare).unwrap();
    assert_eq!(merged.to_string(), "^{CGPoint=\"x\"d\"y\"d}");
}

#[test]
fn struct_member_names_come_from_first_operand() {
    let bare = enc("{CGSize=dd}");
    let named = enc("{CGSize=\"width\"d\"height\"d}");
    assert_eq!(merge_descriptors(&bare, &named).unwrap(), bare);
    assert_eq!(merge_descriptors(&named, &bare).unwrap(), named);
}

#[test]
fn struct_tag_name_prefers_first_present() {
    let anon = enc("{?=ii}");
    let tagged = enc("{_NSRange=ii}");
    assert_eq!(merge_descriptors(&anon, &tagged).unwrap(), tagged);
}

#[test]
fn struct_arity_mismatch_fails() {
    let err = merge_descriptors(&enc("{CGPoint=dd}"), &enc("{CGPoint=ddd}")).unwrap_err();
    assert_eq!(err.conflict, MergeConflict::ArityMismatch { left: 2, right: 3 });
}

#[test]
fn nested_member_conflict_reports_innermost_pair() {
    let err = merge_descriptors(&enc("{Pair=i^i}"), &enc("{Pair=i^q}")).unwrap_err();
    assert_eq!(err.left, "i");
    assert_eq!(err.right, "q");
    assert_eq!(
        err.conflict,
        MergeConflict::PrimitiveMismatch {
            left: Primitive::Int,
            right: Primitive::LongLong
        }
    );
}

#[test]
fn pointer_versus_primitive_fails() {
    let err = merge_descriptors(&enc("^v"), &enc("l")).unwrap_err();
    assert_eq!(
        err.conflict,
        MergeConflict::TagMismatch {
            left: DescriptorTag::Pointer,
            right: DescriptorTag::Primitive
        }
    );
    assert_eq!(err.to_string(), "cannot merge `^v` with `l`: pointer cannot merge with primitive");
}

#[test]
fn primitive_width_is_never_widened() {
    assert!(merge_descriptors(&enc("i"), &enc("q")).is_err());
    assert!(merge_descriptors(&enc("l"), &enc("i")).is_err());
}

#[test]
fn struct_and_union_do_not_merge() {
    let err = merge_descriptors(&enc("{?=i}"), &enc("(?=i)")).unwrap_err();
    assert!(matches!(err.conflict, MergeConflict::TagMismatch { .. }));
}

#[test]
fn arrays_merge_by_length() {
    let merged = merge_descriptors(&enc("[2{?=ii}]"), &enc("[2{Span=ii}]")).unwrap();
    assert_eq!(merged.to_string(), "[2{Span=ii}]");
    let err = merge_descriptors(&enc("[2i]"), &enc("[3i]")).unwrap_err();
    assert_eq!(err.conflict, MergeConflict::ArrayLengthMismatch { left: 2, right: 3 });
}

#[test]
fn merge_shared_reuses_allocation() {
    let a = Arc::new(enc("^v"));
    let b = Arc::new(enc("^v"));
    let merged = merge_shared(&a, &b).unwrap();
    assert!(Arc::ptr_eq(&merged, &a));
}

fn arb_ntype() -> impl Strategy<Value = NType> {
    let leaf = prop_oneof![
        Just(NType::Void),
        Just(NType::Object),
        Just(NType::Selector),
        prop::sample::select(Primitive::ALL.to_vec()).prop_map(NType::Primitive),
    ];
    leaf.prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(NType::pointer),
            (1u32..8, inner.clone()).prop_map(|(len, el)| NType::array(len, el)),
            prop::collection::vec(inner, 0..4)
                .prop_map(|tys| NType::structure(None, tys.into_iter().map(Member::anonymous).collect())),
        ]
    })
}

proptest! {
    #[test]
    fn merge_is_idempotent(ty in arb_ntype()) {
        prop_assert_eq!(merge_descriptors(&ty, &ty), Ok(ty.clone()));
    }

    #[test]
    fn pointer_never_merges_with_primitive(ty in arb_ntype(), p in prop::sample::select(Primitive::ALL.to_vec())) {
        let ptr = NType::pointer(ty);
        let prim = NType::Primitive(p);
        prop_assert!(merge_descriptors(&ptr, &prim).is_err());
        prop_assert!(merge_descriptors(&prim, &ptr).is_err());
    }

    #[test]
    fn structs_of_different_arity_never_merge(
        left in prop::collection::vec(arb_ntype(), 0..4),
        right in prop::collection::vec(arb_ntype(), 0..4),
    ) {
        prop_assume!(left.len() != right.len());
        let a = NType::structure(Some("S"), left.into_iter().map(Member::anonymous).collect());
        let b = NType::structure(Some("S"), right.into_iter().map(Member::anonymous).collect());
        prop_assert!(merge_descriptors(&a, &b).is_err());
    }
}
