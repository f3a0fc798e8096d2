use super::*;
use pretty_assertions::assert_eq;

fn manifest(json: &str) -> Manifest {
    Manifest::parse(json, Path::new("scan.json")).unwrap()
}

fn config() -> GeneratorConfig {
    let mut config = GeneratorConfig::new("scan.json");
    config.runtime_package = "rt".into();
    config
}

#[test]
fn generates_wrappers_index_and_coders() {
    let out = tempfile::tempdir().unwrap();
    let manifest = manifest(
        r#"{
            "package": "com.example",
            "observations": [
                { "name": "NSInteger", "site": "a.h:1", "abi": 32, "encoding": "i" },
                { "name": "NSInteger", "site": "a.h:1", "abi": 64, "encoding": "q" },
                { "name": "CGPoint", "site": "b.h:3", "abi": 32, "encoding": "{CGPoint=ff}" },
                { "name": "CGPoint", "site": "b.h:3", "abi": 64, "encoding": "{CGPoint=dd}" }
            ]
        }"#,
    );

    let summary = generate_into(
        &manifest,
        Path::new(""),
        &config(),
        &EmitOptions::default(),
        &FsDestination::new(out.path()),
    )
    .unwrap();

    assert_eq!(summary.types, 4);
    assert_eq!(summary.collisions, 0);
    assert_eq!(
        summary.artifacts,
        [
            "com/example/CGPoint.java",
            "com/example/Types.java",
            "rt/MixedPrimitiveCoder.java",
        ]
        .map(PathBuf::from)
    );

    let coders = fs::read_to_string(out.path().join("rt/MixedPrimitiveCoder.java")).unwrap();
    assert!(
        coders.contains("\tpublic static final rt.PrimitiveCoder SINT_SLONGLONG = new rt.PrimitiveCoder.Mixed('i', 'q');\n"),
        "{coders}"
    );
    let types = fs::read_to_string(out.path().join("com/example/Types.java")).unwrap();
    assert!(types.contains("{ \"NSInteger\", \"i\", \"q\", \"long\" },"), "{types}");
    assert!(types.contains("{ \"CGPoint\", \"{CGPoint=ff}\", \"{CGPoint=dd}\", \"com.example.CGPoint\" },"), "{types}");
}

#[test]
fn merge_failures_are_aggregated() {
    let out = tempfile::tempdir().unwrap();
    let manifest = manifest(
        r#"{ "observations": [
            { "name": "A", "site": "a.h:1", "abi": 32, "encoding": "^v" },
            { "name": "A", "site": "a.h:2", "abi": 32, "encoding": "i" },
            { "name": "B", "site": "b.h:1", "abi": 32, "encoding": "{S=ii}" },
            { "name": "B", "site": "b.h:2", "abi": 32, "encoding": "{S=i}" }
        ] }"#,
    );

    let err = generate_into(
        &manifest,
        Path::new(""),
        &config(),
        &EmitOptions::default(),
        &FsDestination::new(out.path()),
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "2 declared type(s) could not be merged");
    let names: Vec<_> = err
        .type_errors()
        .iter()
        .map(|e| match e {
            crate::TypeError::Merge(m) => m.name.clone(),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(names, ["A", "B"]);
    assert!(fs::read_dir(out.path()).unwrap().next().is_none(), "nothing is written");
}

#[test]
fn summary_counts_types_and_files() {
    let out = tempfile::tempdir().unwrap();
    let manifest = manifest(
        r#"{ "observations": [
            { "site": "a.h:1", "abi": 32, "encoding": "i" }
        ] }"#,
    );
    let summary = generate_into(
        &manifest,
        Path::new(""),
        &config(),
        &EmitOptions::default(),
        &FsDestination::new(out.path()),
    )
    .unwrap();
    assert_eq!(summary.collisions, 0);
    assert_eq!(summary.to_string(), "3 canonical types, 0 name collisions, 2 files written");
}

#[test]
fn differently_named_types_never_collide_in_a_manifest_run() {
    let out = tempfile::tempdir().unwrap();
    let manifest = manifest(
        r#"{ "observations": [
            { "name": "GLint",   "site": "gl.h:1", "abi": 32, "encoding": "i" },
            { "name": "GLsizei", "site": "gl.h:2", "abi": 32, "encoding": "i" }
        ] }"#,
    );
    let summary = generate_into(
        &manifest,
        Path::new(""),
        &config(),
        &EmitOptions::default(),
        &FsDestination::new(out.path()),
    )
    .unwrap();
    // void, void*, GLint, GLsizei
    assert_eq!(summary.types, 4);
    assert_eq!(summary.collisions, 0);
}
