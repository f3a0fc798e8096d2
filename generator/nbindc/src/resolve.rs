//! Java type mapping for canonical types.

use nbind_emit::MixedPrimitiveCoderClassFile;
use nbind_types::{
    CoderNaming, DescriptorTag, NType, Primitive, ResolveError, TargetKind, TargetResolver, TargetType, Type,
};

use crate::wrappers::wrapper_class_name;

/// Upper-case coder field stem for a primitive (`SINT`, `ULONGLONG`, ...).
pub fn coder_stem(p: Primitive) -> &'static str {
    match p {
        Primitive::Char => "SCHAR",
        Primitive::UChar => "UCHAR",
        Primitive::Short => "SSHORT",
        Primitive::UShort => "USHORT",
        Primitive::Int => "SINT",
        Primitive::UInt => "UINT",
        Primitive::Long => "SLONG",
        Primitive::ULong => "ULONG",
        Primitive::LongLong => "SLONGLONG",
        Primitive::ULongLong => "ULONGLONG",
        Primitive::Float => "FLOAT",
        Primitive::Double => "DOUBLE",
        Primitive::Bool => "BOOL",
    }
}

/// Java primitive holding `p` on the 64-bit ABI.
pub fn java_primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::Char | Primitive::UChar => "byte",
        Primitive::Short | Primitive::UShort => "short",
        Primitive::Int | Primitive::UInt => "int",
        Primitive::Long | Primitive::ULong | Primitive::LongLong | Primitive::ULongLong => "long",
        Primitive::Float => "float",
        Primitive::Double => "double",
        Primitive::Bool => "boolean",
    }
}

/// The Java primitive able to hold values of both ABIs.
fn wider_java_primitive(p32: Primitive, p64: Primitive) -> &'static str {
    if p32.is_floating() || p64.is_floating() {
        return "double";
    }
    if p32.size(nbind_types::AbiWidth::Bits32) > p64.size(nbind_types::AbiWidth::Bits64) {
        java_primitive(p32)
    } else {
        java_primitive(p64)
    }
}

/// Coder naming for the `MixedPrimitiveCoder` table.
#[derive(Clone, Debug)]
pub struct JavaCoderNaming {
    runtime_package: String,
}

impl JavaCoderNaming {
    pub fn new(runtime_package: impl Into<String>) -> Self {
        JavaCoderNaming {
            runtime_package: runtime_package.into(),
        }
    }
}

impl CoderNaming for JavaCoderNaming {
    fn field_name(&self, p32: Primitive, p64: Primitive) -> String {
        format!("{}_{}", coder_stem(p32), coder_stem(p64))
    }

    fn definition(&self, p32: Primitive, p64: Primitive) -> String {
        format!(
            "new {}.PrimitiveCoder.Mixed('{}', '{}')",
            self.runtime_package,
            p32.encoding(),
            p64.encoding()
        )
    }
}

/// Maps canonical types onto the runtime's Java classes.
///
/// Structs and unions map to their generated wrapper in `wrapper_package`,
/// or to the runtime's generic `Struct` / `Union` when nameless and
/// untagged. Types whose primitive differs between ABIs map to the wider
/// Java primitive and a `MixedPrimitiveCoder` field. Any other shape
/// change across ABIs maps to `Pointer` when either side is a pointer and
/// to the 64-bit mapping otherwise. Every type resolves.
#[derive(Clone, Debug)]
pub struct DefaultResolver {
    runtime_package: String,
    wrapper_package: String,
    naming: JavaCoderNaming,
}

impl DefaultResolver {
    pub fn new(runtime_package: impl Into<String>, wrapper_package: impl Into<String>) -> Self {
        let runtime_package = runtime_package.into();
        DefaultResolver {
            naming: JavaCoderNaming::new(runtime_package.clone()),
            runtime_package,
            wrapper_package: wrapper_package.into(),
        }
    }

    pub fn naming(&self) -> &JavaCoderNaming {
        &self.naming
    }

    fn runtime(&self, class: &str) -> String {
        format!("{}.{class}", self.runtime_package)
    }

    fn primitive(&self, p: Primitive) -> TargetType {
        TargetType::new(java_primitive(p), TargetKind::Primitive)
            .with_coder(format!("{}.{}", self.runtime("PrimitiveCoder"), coder_stem(p)))
    }

    fn shape(&self, ty: &Type, shape: &NType) -> TargetType {
        match shape {
            NType::Void => TargetType::new("void", TargetKind::Void),
            NType::Primitive(p) => self.primitive(*p),
            NType::Pointer(_) => TargetType::new(self.runtime("Pointer"), TargetKind::Pointer),
            NType::Struct(_) | NType::Union(_) => {
                let (generic, kind) = if matches!(shape, NType::Struct(_)) {
                    ("Struct", TargetKind::Struct)
                } else {
                    ("Union", TargetKind::Union)
                };
                match wrapper_class_name(ty) {
                    Some(class) => TargetType::new(format!("{}.{class}", self.wrapper_package), kind),
                    None => TargetType::new(self.runtime(generic), kind),
                }
            }
            NType::Array { .. } => TargetType::new(self.runtime("NativeArray"), TargetKind::Array),
            NType::Object => TargetType::new(self.runtime("ID"), TargetKind::Object),
            NType::Class => TargetType::new(self.runtime("NSClass"), TargetKind::Object),
            NType::Selector => TargetType::new(self.runtime("SEL"), TargetKind::Object),
        }
    }
}

impl TargetResolver for DefaultResolver {
    fn resolve(&self, ty: &Type) -> Result<TargetType, ResolveError> {
        if let Some((p32, p64)) = ty.mixed_primitives() {
            let field = self.naming.field_name(p32, p64);
            let table = MixedPrimitiveCoderClassFile::qualified_name(&self.runtime_package);
            return Ok(TargetType::new(wider_java_primitive(p32, p64), TargetKind::Primitive)
                .with_coder(format!("{table}.{field}")));
        }
        let (s32, s64) = (ty.shape32(), ty.shape64());
        if s32.tag() != s64.tag() {
            tracing::debug!(ty = %ty, "shape differs across ABIs");
            if s32.tag() == DescriptorTag::Pointer || s64.tag() == DescriptorTag::Pointer {
                return Ok(TargetType::new(self.runtime("Pointer"), TargetKind::Pointer));
            }
        }
        Ok(self.shape(ty, s64))
    }
}
