//! Templated class artifacts.
//!
//! Every generated class shares one template:
//!
//! ```text
//! package <package>;
//!
//! import <import>;          (one per import, block omitted when empty)
//!
//! public <class|interface> <Name> extends <Supertype> {
//! <body>
//! }
//! ```
//!
//! The body comes from a [`ClassBody`] implementation.

use std::io::{self, Write};

use crate::destination::ArtifactTarget;

/// File extension of generated sources.
pub const SOURCE_EXTENSION: &str = "java";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
}

impl ClassKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
        }
    }
}

/// Declaration part of a generated class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassHeader {
    pub package: String,
    pub name: String,
    pub kind: ClassKind,
    pub supertype: String,
    pub imports: Vec<String>,
}

impl ClassHeader {
    pub fn new(package: impl Into<String>, name: impl Into<String>, supertype: impl Into<String>) -> Self {
        ClassHeader {
            package: package.into(),
            name: name.into(),
            kind: ClassKind::Class,
            supertype: supertype.into(),
            imports: Vec::new(),
        }
    }

    #[must_use]
    pub fn interface(mut self) -> Self {
        self.kind = ClassKind::Interface;
        self
    }

    #[must_use]
    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    /// Fully qualified class name.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    pub fn target(&self) -> ArtifactTarget {
        ArtifactTarget::new(&self.package, format!("{}.{SOURCE_EXTENSION}", self.name))
    }

    fn write_open(&self, out: &mut dyn Write) -> io::Result<()> {
        if !self.package.is_empty() {
            writeln!(out, "package {};", self.package)?;
            writeln!(out)?;
        }
        if !self.imports.is_empty() {
            for import in &self.imports {
                writeln!(out, "import {import};")?;
            }
            writeln!(out)?;
        }
        writeln!(
            out,
            "public {} {} extends {} {{",
            self.kind.keyword(),
            self.name,
            self.supertype
        )
    }

    fn write_close(out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "}}")
    }
}

/// Variant-specific body of a generated class.
pub trait ClassBody {
    fn header(&self) -> &ClassHeader;

    fn write_body(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Write the whole class: optional fixed header, declaration, body, close.
pub(crate) fn write_class(out: &mut dyn Write, file_header: Option<&str>, class: &dyn ClassBody) -> io::Result<()> {
    if let Some(text) = file_header {
        out.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writeln!(out)?;
        }
    }
    class.header().write_open(out)?;
    class.write_body(out)?;
    ClassHeader::write_close(out)
}

/// A class whose body is a list of prepared source lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedClassFile {
    header: ClassHeader,
    lines: Vec<String>,
}

impl GeneratedClassFile {
    pub fn new(header: ClassHeader) -> Self {
        GeneratedClassFile {
            header,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl ClassBody for GeneratedClassFile {
    fn header(&self) -> &ClassHeader {
        &self.header
    }

    fn write_body(&self, out: &mut dyn Write) -> io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
