//! Native type descriptors for a single ABI width.
//!
//! An [`NType`] is the shape the scanner reports for one declaration on one
//! architecture. Descriptors are plain immutable data: equality and hashing
//! are structural, and the textual form is the native runtime's type
//! encoding (`^{CGPoint=dd}`, `[4i]`, ...), see [`crate::encoding`].

use std::fmt;

/// Which native ABI a descriptor was scanned from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AbiWidth {
    /// The 32-bit ABI (ILP32).
    Bits32,
    /// The 64-bit ABI (LP64).
    Bits64,
}

impl AbiWidth {
    /// Pointer size in bytes on this ABI.
    pub const fn pointer_size(self) -> u8 {
        match self {
            AbiWidth::Bits32 => 4,
            AbiWidth::Bits64 => 8,
        }
    }

    /// Map a numeric width (`32` / `64`) to an ABI.
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(AbiWidth::Bits32),
            64 => Some(AbiWidth::Bits64),
            _ => None,
        }
    }
}

impl fmt::Display for AbiWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiWidth::Bits32 => f.write_str("32-bit"),
            AbiWidth::Bits64 => f.write_str("64-bit"),
        }
    }
}

/// Scalar types with a fixed width/signedness tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    /// `long`: 4 bytes on 32-bit, 8 bytes on 64-bit.
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    Bool,
}

impl Primitive {
    pub const ALL: [Primitive; 13] = [
        Primitive::Char,
        Primitive::UChar,
        Primitive::Short,
        Primitive::UShort,
        Primitive::Int,
        Primitive::UInt,
        Primitive::Long,
        Primitive::ULong,
        Primitive::LongLong,
        Primitive::ULongLong,
        Primitive::Float,
        Primitive::Double,
        Primitive::Bool,
    ];

    /// The type-encoding character for this primitive.
    pub const fn encoding(self) -> char {
        match self {
            Primitive::Char => 'c',
            Primitive::UChar => 'C',
            Primitive::Short => 's',
            Primitive::UShort => 'S',
            Primitive::Int => 'i',
            Primitive::UInt => 'I',
            Primitive::Long => 'l',
            Primitive::ULong => 'L',
            Primitive::LongLong => 'q',
            Primitive::ULongLong => 'Q',
            Primitive::Float => 'f',
            Primitive::Double => 'd',
            Primitive::Bool => 'B',
        }
    }

    /// Inverse of [`Primitive::encoding`].
    pub fn from_encoding(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.encoding() == c)
    }

    /// Size in bytes on the given ABI.
    pub const fn size(self, width: AbiWidth) -> u8 {
        match self {
            Primitive::Char | Primitive::UChar | Primitive::Bool => 1,
            Primitive::Short | Primitive::UShort => 2,
            Primitive::Int | Primitive::UInt | Primitive::Float => 4,
            Primitive::Long | Primitive::ULong => width.pointer_size(),
            Primitive::LongLong | Primitive::ULongLong | Primitive::Double => 8,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Primitive::Char
                | Primitive::Short
                | Primitive::Int
                | Primitive::Long
                | Primitive::LongLong
                | Primitive::Float
                | Primitive::Double
        )
    }

    pub const fn is_floating(self) -> bool {
        matches!(self, Primitive::Float | Primitive::Double)
    }
}

/// Variant tag of a descriptor, used in conflict reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DescriptorTag {
    Void,
    Primitive,
    Pointer,
    Struct,
    Union,
    Array,
    Object,
    Class,
    Selector,
}

impl fmt::Display for DescriptorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DescriptorTag::Void => "void",
            DescriptorTag::Primitive => "primitive",
            DescriptorTag::Pointer => "pointer",
            DescriptorTag::Struct => "struct",
            DescriptorTag::Union => "union",
            DescriptorTag::Array => "array",
            DescriptorTag::Object => "object",
            DescriptorTag::Class => "class",
            DescriptorTag::Selector => "selector",
        };
        f.write_str(s)
    }
}

/// A native type shape on one ABI width.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NType {
    Void,
    Primitive(Primitive),
    Pointer(Box<NType>),
    Struct(Composite),
    Union(Composite),
    /// Fixed-length array (`[4i]`).
    Array { len: u32, element: Box<NType> },
    /// An object reference (`id`).
    Object,
    /// A class reference (`Class`).
    Class,
    /// A selector (`SEL`).
    Selector,
}

/// Payload shared by structs and unions: optional tag name plus ordered members.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Composite {
    pub name: Option<String>,
    pub members: Vec<Member>,
}

/// One member of a struct or union.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Member {
    pub name: Option<String>,
    pub ty: NType,
}

impl Member {
    pub fn named(name: impl Into<String>, ty: NType) -> Self {
        Member {
            name: Some(name.into()),
            ty,
        }
    }

    pub fn anonymous(ty: NType) -> Self {
        Member { name: None, ty }
    }
}

impl Composite {
    pub fn new(name: Option<&str>, members: Vec<Member>) -> Self {
        Composite {
            name: name.map(str::to_owned),
            members,
        }
    }
}

impl NType {
    pub fn pointer(pointee: NType) -> Self {
        NType::Pointer(Box::new(pointee))
    }

    pub fn structure(name: Option<&str>, members: Vec<Member>) -> Self {
        NType::Struct(Composite::new(name, members))
    }

    pub fn union(name: Option<&str>, members: Vec<Member>) -> Self {
        NType::Union(Composite::new(name, members))
    }

    pub fn array(len: u32, element: NType) -> Self {
        NType::Array {
            len,
            element: Box::new(element),
        }
    }

    pub fn tag(&self) -> DescriptorTag {
        match self {
            NType::Void => DescriptorTag::Void,
            NType::Primitive(_) => DescriptorTag::Primitive,
            NType::Pointer(_) => DescriptorTag::Pointer,
            NType::Struct(_) => DescriptorTag::Struct,
            NType::Union(_) => DescriptorTag::Union,
            NType::Array { .. } => DescriptorTag::Array,
            NType::Object => DescriptorTag::Object,
            NType::Class => DescriptorTag::Class,
            NType::Selector => DescriptorTag::Selector,
        }
    }

    /// The primitive, if this descriptor is one.
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            NType::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Struct or union payload.
    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            NType::Struct(c) | NType::Union(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Primitive> for NType {
    fn from(p: Primitive) -> Self {
        NType::Primitive(p)
    }
}

impl fmt::Display for NType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NType::Void => f.write_str("v"),
            NType::Primitive(p) => write!(f, "{}", p.encoding()),
            NType::Pointer(inner) => write!(f, "^{inner}"),
            NType::Struct(c) => write_composite(f, '{', '}', c),
            NType::Union(c) => write_composite(f, '(', ')', c),
            NType::Array { len, element } => write!(f, "[{len}{element}]"),
            NType::Object => f.write_str("@"),
            NType::Class => f.write_str("#"),
            NType::Selector => f.write_str(":"),
        }
    }
}

fn write_composite(f: &mut fmt::Formatter<'_>, open: char, close: char, c: &Composite) -> fmt::Result {
    write!(f, "{open}{}", c.name.as_deref().unwrap_or("?"))?;
    if !c.members.is_empty() {
        f.write_str("=")?;
        for member in &c.members {
            if let Some(name) = &member.name {
                write!(f, "\"{name}\"")?;
            }
            write!(f, "{}", member.ty)?;
        }
    }
    write!(f, "{close}")
}
