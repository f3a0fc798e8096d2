//! The closed set of output artifacts and their write lifecycle.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::class::{write_class, ClassBody, GeneratedClassFile};
use crate::copied::CopiedFile;
use crate::destination::{ArtifactTarget, Destination};
use crate::error::EmitError;
use crate::mixed_coder::MixedPrimitiveCoderClassFile;

/// Options shared by every artifact in one emission run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Fixed text written before each generated class. Copies are never
    /// prefixed.
    pub header: Option<String>,
}

impl EmitOptions {
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

/// One output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Artifact {
    /// Hand-written source copied verbatim.
    Copied(CopiedFile),
    /// Templated class with a prepared body.
    Class(GeneratedClassFile),
    /// The static mixed coder table.
    MixedCoders(MixedPrimitiveCoderClassFile),
}

impl Artifact {
    pub fn target(&self) -> ArtifactTarget {
        match self {
            Artifact::Copied(file) => file.target().clone(),
            Artifact::Class(class) => class.header().target(),
            Artifact::MixedCoders(class) => class.header().target(),
        }
    }

    /// Short variant name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::Copied(_) => "copied",
            Artifact::Class(_) => "class",
            Artifact::MixedCoders(_) => "mixed-coders",
        }
    }

    /// Open the sink, write, flush, close.
    ///
    /// The sink is dropped exactly once whether or not writing succeeded.
    /// Returns the relative path written.
    pub fn write<D>(&self, dest: &D, options: &EmitOptions) -> Result<PathBuf, EmitError>
    where
        D: Destination + ?Sized,
    {
        let relative = self.target().relative_path();
        trace!(path = %relative.display(), kind = self.kind(), "opening artifact");

        let mut sink = dest.open(&relative).map_err(|source| EmitError::Open {
            path: relative.clone(),
            source,
        })?;

        let result = self.write_into(&mut sink, &relative, options).and_then(|()| {
            sink.flush().map_err(|source| EmitError::Write {
                path: relative.clone(),
                source,
            })
        });
        drop(sink);

        match &result {
            Ok(()) => trace!(path = %relative.display(), "closed artifact"),
            Err(error) => trace!(path = %relative.display(), %error, "closed artifact after failure"),
        }
        result.map(|()| relative)
    }

    fn write_into(&self, out: &mut dyn Write, relative: &Path, options: &EmitOptions) -> Result<(), EmitError> {
        let header = options.header.as_deref();
        let class_result = match self {
            Artifact::Copied(file) => return file.write_body(out, relative),
            Artifact::Class(class) => write_class(out, header, class),
            Artifact::MixedCoders(class) => write_class(out, header, class),
        };
        class_result.map_err(|source| EmitError::Write {
            path: relative.to_path_buf(),
            source,
        })
    }
}

impl From<CopiedFile> for Artifact {
    fn from(file: CopiedFile) -> Self {
        Artifact::Copied(file)
    }
}

impl From<GeneratedClassFile> for Artifact {
    fn from(class: GeneratedClassFile) -> Self {
        Artifact::Class(class)
    }
}

impl From<MixedPrimitiveCoderClassFile> for Artifact {
    fn from(class: MixedPrimitiveCoderClassFile) -> Self {
        Artifact::MixedCoders(class)
    }
}
