use super::*;
use crate::error::MergeConflict;
use crate::overrides::MergeOverride;
use pretty_assertions::assert_eq;
use std::cell::Cell;

fn enc(s: &str) -> NType {
    match s.parse() {
        Ok(ty) => ty,
        Err(e) => panic!("bad encoding `{s}`: {e}"),
    }
}

fn ty(name: &str, e32: &str, e64: &str) -> Arc<Type> {
    Arc::new(Type::new(Some(name), enc(e32), Some(enc(e64))))
}

#[test]
fn name_whitespace_is_removed() {
    assert_eq!(clean_name("id <A, B>"), "id<A,B>");
    assert_eq!(clean_name("  unsigned\tlong \n"), "unsignedlong");
    let spaced = Type::new(Some("id <A, B>"), NType::Object, None);
    let tight = Type::new(Some("id<A,B>"), NType::Object, None);
    assert_eq!(spaced, tight);
    assert_eq!(spaced.name(), Some("id<A,B>"));
}

#[test]
fn equal_shapes_collapse_to_one_descriptor() {
    let t = Type::new(Some("CGFloat"), enc("f"), Some(enc("f")));
    assert!(t.is_single_width());
    assert!(Arc::ptr_eq(t.shape32(), t.shape64()));

    let absent = Type::new(Some("int"), enc("i"), None);
    assert!(absent.is_single_width());

    let mixed = Type::new(Some("NSInteger"), enc("i"), Some(enc("q")));
    assert!(!mixed.is_single_width());
    assert_eq!(mixed.mixed_primitives(), Some((Primitive::Int, Primitive::LongLong)));
    assert_eq!(mixed.shape(AbiWidth::Bits64).as_ref(), &enc("q"));
}

#[test]
fn missing_32_bit_shape_is_an_invariant_violation() {
    let err = Type::try_new(Some("Foo "), None, Some(enc("i"))).unwrap_err();
    assert_eq!(
        err,
        InvariantViolation::MissingShape32 {
            name: Some("Foo".to_owned())
        }
    );
    assert!(Type::try_new(None, Some(enc("v")), None).is_ok());
}

#[test]
fn display_and_ordering() {
    let t = Type::new(Some("NSUInteger"), enc("I"), Some(enc("Q")));
    assert_eq!(t.to_string(), "NSUInteger (I / Q)");
    let anon = Type::new(None, enc("^v"), None);
    assert_eq!(anon.display(), "<anonymous> (^v / ^v)");

    let mut types = [ty("b", "i", "i"), ty("a", "i", "q"), ty("a", "i", "i")];
    types.sort();
    let names: Vec<_> = types.iter().map(|t| t.to_string()).collect();
    assert_eq!(names, ["a (i / i)", "a (i / q)", "b (i / i)"]);
}

#[test]
fn equality_treats_absent_names_as_equal() {
    assert_eq!(Type::new(None, enc("i"), None), Type::new(None, enc("i"), None));
    assert_ne!(Type::new(None, enc("i"), None), Type::new(Some("int"), enc("i"), None));
}

#[test]
fn merge_absorbs_absent_operand() {
    let mut merger = TypeMerger::new();
    let a = ty("CGFloat", "f", "d");
    let merged = merger.merge(Some(Arc::clone(&a)), None).unwrap().unwrap();
    assert!(Arc::ptr_eq(&merged, &a));
    let merged = merger.merge(None, Some(Arc::clone(&a))).unwrap().unwrap();
    assert!(Arc::ptr_eq(&merged, &a));
    assert_eq!(merger.merge(None, None).unwrap(), None);
}

#[test]
fn merge_is_idempotent() {
    let mut merger = TypeMerger::new();
    let a = ty("CGRect", "{CGRect={CGPoint=ff}{CGSize=ff}}", "{CGRect={CGPoint=dd}{CGSize=dd}}");
    let b = ty("CGRect", "{CGRect={CGPoint=ff}{CGSize=ff}}", "{CGRect={CGPoint=dd}{CGSize=dd}}");
    let merged = merger.merge(Some(Arc::clone(&a)), Some(b)).unwrap().unwrap();
    assert!(Arc::ptr_eq(&merged, &a));
    assert!(merger.collisions().is_empty());
}

#[test]
fn merge_keeps_first_operand_member_names() {
    let mut merger = TypeMerger::new();
    let a = ty("NSRange", "{_NSRange=II}", "{_NSRange=QQ}");
    let b = ty("NSRange", "{_NSRange=\"location\"I\"length\"I}", "{_NSRange=\"location\"Q\"length\"Q}");
    let merged = merger.merge(Some(a), Some(b)).unwrap().unwrap();
    assert_eq!(merged.shape32().to_string(), "{_NSRange=II}");
}

#[test]
fn os_status_override_keeps_first_operand() {
    let mut merger = TypeMerger::new();
    let long_int = ty("OSStatus", "l", "i");
    let long_long = ty("OSStatus", "l", "l");
    let merged = merger
        .merge(Some(Arc::clone(&long_int)), Some(long_long))
        .unwrap()
        .unwrap();
    assert!(Arc::ptr_eq(&merged, &long_int));
}

#[test]
fn without_override_os_status_conflicts() {
    let mut merger = TypeMerger::with_overrides(MergeOverrides::empty());
    let err = merger
        .merge(Some(ty("OSStatus", "l", "i")), Some(ty("OSStatus", "l", "l")))
        .unwrap_err();
    assert_eq!(err.width, AbiWidth::Bits64);
    assert_eq!(err.name, "OSStatus");
    assert!(matches!(err.source.conflict, MergeConflict::PrimitiveMismatch { .. }));
}

#[test]
fn custom_override_entries_apply() {
    let mut overrides = MergeOverrides::empty();
    overrides.insert(MergeOverride {
        name: "CFIndex".to_owned(),
        rule: OverrideRule::KeepFirst,
        reason: "test".to_owned(),
    });
    let mut merger = TypeMerger::with_overrides(overrides);
    let a = ty("CFIndex", "l", "q");
    let merged = merger.merge(Some(Arc::clone(&a)), Some(ty("CFIndex", "i", "q"))).unwrap();
    assert!(merged.is_some_and(|m| Arc::ptr_eq(&m, &a)));
}

#[test]
fn pointer_versus_primitive_fails_on_32_bit_axis() {
    let mut merger = TypeMerger::new();
    let err = merger
        .merge(Some(ty("Ref", "^v", "^v")), Some(ty("Ref", "l", "q")))
        .unwrap_err();
    assert_eq!(err.width, AbiWidth::Bits32);
    assert_eq!(err.name, "Ref");
    assert_eq!(err.to_string(), "conflicting 32-bit declarations of `Ref`");
}

#[test]
fn name_collision_is_recorded_not_failed() {
    let mut merger = TypeMerger::new();
    let a = ty("GLint", "i", "i");
    let b = ty("GLsizei", "i", "i");
    let merged = merger.merge(Some(a), Some(b)).unwrap().unwrap();
    assert_eq!(merged.name(), Some("GLint"));
    assert_eq!(merger.collisions().len(), 1);
    let collision = &merger.collisions()[0];
    assert_eq!(collision.right.name(), Some("GLsizei"));
    assert!(Arc::ptr_eq(&collision.merged, &merged));
}

#[test]
fn anonymous_conflict_is_reported_as_anonymous() {
    let mut merger = TypeMerger::new();
    let a = Arc::new(Type::new(None, enc("{?=ii}"), None));
    let b = Arc::new(Type::new(None, enc("{?=i}"), None));
    let err = merger.merge(Some(a), Some(b)).unwrap_err();
    assert_eq!(err.name, "<anonymous>");
    assert_eq!(err.width, AbiWidth::Bits32);
}

#[test]
fn anonymous_merges_take_the_present_name() {
    let mut merger = TypeMerger::new();
    let anon = Arc::new(Type::new(None, enc("{?=ii}"), None));
    let named = ty("Pair", "{Pair=ii}", "{Pair=ii}");
    let merged = merger.merge(Some(anon), Some(named)).unwrap().unwrap();
    assert_eq!(merged.name(), Some("Pair"));
    assert_eq!(merged.shape32().to_string(), "{Pair=ii}");
    assert!(merged.is_single_width());
    assert!(merger.collisions().is_empty());
}

struct CountingResolver {
    calls: Cell<usize>,
}

impl TargetResolver for CountingResolver {
    fn resolve(&self, ty: &Type) -> Result<TargetType, ResolveError> {
        self.calls.set(self.calls.get() + 1);
        Ok(TargetType::new(
            ty.name().unwrap_or("Object"),
            crate::target::TargetKind::Primitive,
        ))
    }
}

#[test]
fn target_type_is_resolved_once() {
    let resolver = CountingResolver { calls: Cell::new(0) };
    let t = Type::new(Some("int"), enc("i"), None);
    assert!(t.cached_target().is_none());
    assert_eq!(t.target_type(&resolver).unwrap().name, "int");
    assert_eq!(t.target_type(&resolver).unwrap().name, "int");
    assert_eq!(resolver.calls.get(), 1);
    assert!(t.cached_target().is_some());
}

#[test]
fn resolve_failure_is_not_cached() {
    let failing = |ty: &Type| -> Result<TargetType, ResolveError> { Err(ResolveError::unresolvable(ty, "no mapping")) };
    let t = Type::new(Some("mystery"), enc("#"), None);
    let err = t.target_type(&failing).unwrap_err();
    assert_eq!(err.to_string(), "no target type for `mystery (# / #)`: no mapping");
    assert!(t.cached_target().is_none());
}
