//! The static table of mixed primitive coders.

use std::io::{self, Write};

use nbind_types::MixedEncodingDescriptor;

use crate::class::{ClassBody, ClassHeader};

/// Simple name of the generated coder table class.
pub const MIXED_CODER_CLASS_NAME: &str = "MixedPrimitiveCoder";

/// One `public static final` coder field per mixed-encoding descriptor,
/// in the order the descriptors were supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MixedPrimitiveCoderClassFile {
    header: ClassHeader,
    coder_class: String,
    coders: Vec<MixedEncodingDescriptor>,
}

impl MixedPrimitiveCoderClassFile {
    /// Table class in `runtime_package`; field type is the runtime's
    /// `PrimitiveCoder`.
    pub fn new(runtime_package: &str, coders: Vec<MixedEncodingDescriptor>) -> Self {
        MixedPrimitiveCoderClassFile {
            header: ClassHeader::new(runtime_package, MIXED_CODER_CLASS_NAME, "java.lang.Object"),
            coder_class: format!("{runtime_package}.PrimitiveCoder"),
            coders,
        }
    }

    /// Fully qualified name of the table class.
    pub fn qualified_name(runtime_package: &str) -> String {
        format!("{runtime_package}.{MIXED_CODER_CLASS_NAME}")
    }

    pub fn coders(&self) -> &[MixedEncodingDescriptor] {
        &self.coders
    }
}

impl ClassBody for MixedPrimitiveCoderClassFile {
    fn header(&self) -> &ClassHeader {
        &self.header
    }

    fn write_body(&self, out: &mut dyn Write) -> io::Result<()> {
        for desc in &self.coders {
            writeln!(
                out,
                "\tpublic static final {} {} = {};",
                self.coder_class,
                desc.mixed_name(),
                desc.definition()
            )?;
        }
        Ok(())
    }
}
