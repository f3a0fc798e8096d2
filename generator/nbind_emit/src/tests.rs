use std::fs;

use pretty_assertions::assert_eq;

use super::*;

fn class(package: &str, name: &str, line: &str) -> Artifact {
    GeneratedClassFile::new(ClassHeader::new(package, name, "java.lang.Object"))
        .with_lines([line])
        .into()
}

#[test]
fn duplicate_targets_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let dest = FsDestination::new(dir.path());
    let artifacts = [class("p", "A", "\tint a;"), class("q", "B", "\tint b;"), class("p", "A", "\tint c;")];

    let err = emit_all(&artifacts, &dest, &EmitOptions::default(), false).unwrap_err();
    assert!(matches!(err, EmitError::DuplicateTarget { .. }), "{err:?}");
    assert!(!dir.path().join("q/B.java").exists());
}

#[test]
fn parallel_and_sequential_emission_agree() {
    let artifacts: Vec<_> = (0..32)
        .map(|i| class("com.example", &format!("C{i}"), &format!("\tint f{i};")))
        .collect();

    let seq_dir = tempfile::tempdir().unwrap();
    let par_dir = tempfile::tempdir().unwrap();
    let options = EmitOptions::default().with_header("// generated");
    let seq = emit_all(&artifacts, &FsDestination::new(seq_dir.path()), &options, false).unwrap();
    let par = emit_all(&artifacts, &FsDestination::new(par_dir.path()), &options, true).unwrap();

    assert_eq!(seq, par);
    for path in &seq {
        let a = fs::read(seq_dir.path().join(path)).unwrap();
        let b = fs::read(par_dir.path().join(path)).unwrap();
        assert_eq!(a, b);
    }
}
