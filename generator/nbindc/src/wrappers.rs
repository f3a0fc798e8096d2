//! Generated class artifacts built from the frozen registry.

use std::path::Path;
use std::sync::Arc;

use nbind_emit::{
    Artifact, ClassBody, ClassHeader, CopiedFile, GeneratedClassFile, MixedPrimitiveCoderClassFile,
};
use nbind_types::{group_mixed_encodings, FrozenRegistry, NType, Type};
use rustc_hash::FxHashSet;

use crate::manifest::{Manifest, ManifestError};
use crate::resolve::JavaCoderNaming;

/// Simple name of the type index class.
pub const TYPES_CLASS_NAME: &str = "Types";

/// Wrapper class name for a struct or union type.
///
/// Uses the declared name, falling back to the composite's tag name.
pub fn wrapper_class_name(ty: &Type) -> Option<String> {
    let composite = ty.shape64().as_composite()?;
    let raw = ty.name().or(composite.name.as_deref())?;
    Some(java_identifier(raw))
}

/// Replace characters Java identifiers cannot hold.
pub fn java_identifier(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Java string literal, quotes included.
pub fn java_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Wrapper class for one struct or union type.
pub fn struct_wrapper(ty: &Type, package: &str, runtime_package: &str) -> Option<GeneratedClassFile> {
    let class = wrapper_class_name(ty)?;
    let composite = ty.shape64().as_composite()?;
    let supertype = match ty.shape64().as_ref() {
        NType::Union(_) => format!("{runtime_package}.Union"),
        _ => format!("{runtime_package}.Struct"),
    };

    let members: Vec<String> = composite
        .members
        .iter()
        .map(|m| java_string(m.name.as_deref().unwrap_or("")))
        .collect();

    let mut file = GeneratedClassFile::new(ClassHeader::new(package, &class, supertype));
    file.push_line(format!(
        "\tpublic static final String ENCODING_32 = {};",
        java_string(&ty.shape32().to_string())
    ));
    file.push_line(format!(
        "\tpublic static final String ENCODING_64 = {};",
        java_string(&ty.shape64().to_string())
    ));
    file.push_line(format!("\tpublic static final String[] MEMBERS = {{ {} }};", members.join(", ")));
    file.push_line("");
    file.push_line(format!("\tpublic {class}({runtime_package}.NativeBuffer buffer) {{"));
    file.push_line("\t\tsuper(buffer);");
    file.push_line("\t}");
    Some(file)
}

/// Index of every canonical type: name, both encodings, Java type.
pub fn types_index(types: &[Arc<Type>], package: &str) -> GeneratedClassFile {
    let mut file = GeneratedClassFile::new(ClassHeader::new(package, TYPES_CLASS_NAME, "java.lang.Object"));
    file.push_line("\tpublic static final String[][] ENTRIES = {");
    for ty in types {
        let name = ty.name().map_or_else(|| "null".to_string(), java_string);
        let target = ty
            .cached_target()
            .map_or_else(|| "null".to_string(), |t| java_string(&t.name));
        file.push_line(format!(
            "\t\t{{ {name}, {}, {}, {target} }},",
            java_string(&ty.shape32().to_string()),
            java_string(&ty.shape64().to_string()),
        ));
    }
    file.push_line("\t};");
    file.push_line("");
    file.push_line(format!("\tprivate {TYPES_CLASS_NAME}() {{}}"));
    file
}

/// Every artifact for one run, in emission order: copies, struct
/// wrappers (sorted by type), the type index, the mixed coder table.
#[tracing::instrument(level = "debug", skip_all, fields(types = registry.len()))]
pub fn build_artifacts(
    registry: &FrozenRegistry,
    manifest: &Manifest,
    base_dir: &Path,
    runtime_package: &str,
    naming: &JavaCoderNaming,
) -> Result<Vec<Artifact>, ManifestError> {
    let package = manifest.package();
    let mut artifacts = Vec::new();

    for copy in &manifest.copies {
        let file_name = copy.target_file_name()?;
        artifacts.push(CopiedFile::new(copy.resolved_source(base_dir), copy.package.clone(), file_name).into());
    }

    let sorted = registry.sorted();
    let mut classes = FxHashSet::default();
    for ty in &sorted {
        let Some(wrapper) = struct_wrapper(ty, package, runtime_package) else {
            continue;
        };
        if wrapper.header().name == TYPES_CLASS_NAME || !classes.insert(wrapper.header().name.clone()) {
            tracing::warn!(ty = %ty, class = %wrapper.header().name, "wrapper class name already taken, skipped");
            continue;
        }
        artifacts.push(wrapper.into());
    }
    tracing::debug!(wrappers = classes.len(), "built struct wrappers");

    artifacts.push(types_index(&sorted, package).into());

    let coders = group_mixed_encodings(registry.iter(), naming);
    artifacts.push(MixedPrimitiveCoderClassFile::new(runtime_package, coders).into());
    Ok(artifacts)
}
