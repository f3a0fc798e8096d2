use super::*;
use pretty_assertions::assert_eq;

fn render(class: &dyn ClassBody, file_header: Option<&str>) -> String {
    let mut out = Vec::new();
    write_class(&mut out, file_header, class).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn class_template_layout() {
    let header = ClassHeader::new("com.example.types", "NSRange", "org.nbind.runtime.Struct")
        .with_import("org.nbind.runtime.Pointer")
        .with_import("org.nbind.runtime.StructDescriptor");
    let class = GeneratedClassFile::new(header).with_lines(["\tpublic long location;", "\tpublic long length;"]);

    assert_eq!(
        render(&class, None),
        "package com.example.types;\n\
         \n\
         import org.nbind.runtime.Pointer;\n\
         import org.nbind.runtime.StructDescriptor;\n\
         \n\
         public class NSRange extends org.nbind.runtime.Struct {\n\
         \tpublic long location;\n\
         \tpublic long length;\n\
         }\n"
    );
}

#[test]
fn imports_block_omitted_when_empty() {
    let class = GeneratedClassFile::new(ClassHeader::new("p", "Empty", "java.lang.Object").interface());
    assert_eq!(render(&class, None), "package p;\n\npublic interface Empty extends java.lang.Object {\n}\n");
}

#[test]
fn file_header_precedes_declaration() {
    let class = GeneratedClassFile::new(ClassHeader::new("p", "A", "java.lang.Object"));
    let text = render(&class, Some("// generated"));
    assert!(text.starts_with("// generated\npackage p;\n"), "{text}");
}

#[test]
fn target_uses_source_extension() {
    let header = ClassHeader::new("com.example", "Types", "java.lang.Object");
    assert_eq!(header.target(), ArtifactTarget::new("com.example", "Types.java"));
    assert_eq!(header.qualified_name(), "com.example.Types");
    assert_eq!(ClassHeader::new("", "Types", "java.lang.Object").qualified_name(), "Types");
}
