//! Types of the source platform.
//!
//! Eight primitive kinds plus references, arrays, method types, the null
//! type and parameterized (generic) references. `void` is kept as its own
//! variant because it only ever appears as a method return type.

use std::fmt;

use crate::known;
use crate::name::FqName;

/// The eight primitive kinds of the source platform.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimType {
    Bool,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimType {
    pub const ALL: [PrimType; 8] = [
        PrimType::Bool,
        PrimType::Byte,
        PrimType::Short,
        PrimType::Char,
        PrimType::Int,
        PrimType::Long,
        PrimType::Float,
        PrimType::Double,
    ];

    /// One-letter JVM descriptor.
    pub const fn descriptor(self) -> char {
        match self {
            Self::Bool => 'Z',
            Self::Byte => 'B',
            Self::Short => 'S',
            Self::Char => 'C',
            Self::Int => 'I',
            Self::Long => 'J',
            Self::Float => 'F',
            Self::Double => 'D',
        }
    }

    /// Source-level keyword.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// The boxed wrapper class (`java.lang.Integer` for `int`).
    pub fn boxed_class(self) -> FqName {
        FqName::new(match self {
            Self::Bool => known::BOOLEAN,
            Self::Byte => known::BYTE,
            Self::Short => known::SHORT,
            Self::Char => known::CHARACTER,
            Self::Int => known::INTEGER,
            Self::Long => known::LONG,
            Self::Float => known::FLOAT,
            Self::Double => known::DOUBLE,
        })
    }

    /// Inverse of [`boxed_class`](Self::boxed_class).
    pub fn from_boxed(name: &FqName) -> Option<PrimType> {
        Self::ALL
            .into_iter()
            .find(|prim| prim.boxed_class() == *name)
    }

    /// Accessor on the wrapper class returning the primitive value.
    pub const fn unbox_accessor(self) -> &'static str {
        match self {
            Self::Bool => "booleanValue",
            Self::Byte => "byteValue",
            Self::Short => "shortValue",
            Self::Char => "charValue",
            Self::Int => "intValue",
            Self::Long => "longValue",
            Self::Float => "floatValue",
            Self::Double => "doubleValue",
        }
    }

    /// Byte, short, char and int: all represented as a 32-bit target integer.
    pub const fn is_int_like(self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Char | Self::Int)
    }

    pub const fn is_floating(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }
}

/// A source-platform type.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Void,
    Prim(PrimType),
    Ref(FqName),
    Array(Box<Type>),
    Method(Box<MethodType>),
    /// Type of the `null` literal.
    Null,
    /// A parameterized reference; erases to `base`.
    Generic { base: FqName, args: Vec<Type> },
}

impl Type {
    pub const BOOL: Type = Type::Prim(PrimType::Bool);
    pub const BYTE: Type = Type::Prim(PrimType::Byte);
    pub const SHORT: Type = Type::Prim(PrimType::Short);
    pub const CHAR: Type = Type::Prim(PrimType::Char);
    pub const INT: Type = Type::Prim(PrimType::Int);
    pub const LONG: Type = Type::Prim(PrimType::Long);
    pub const FLOAT: Type = Type::Prim(PrimType::Float);
    pub const DOUBLE: Type = Type::Prim(PrimType::Double);

    pub fn reference(name: impl Into<FqName>) -> Type {
        Type::Ref(name.into())
    }

    pub fn array(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    pub fn object() -> Type {
        Type::reference(known::OBJECT)
    }

    pub fn string() -> Type {
        Type::reference(known::STRING)
    }

    #[inline]
    pub fn as_prim(&self) -> Option<PrimType> {
        match self {
            Type::Prim(prim) => Some(*prim),
            _ => None,
        }
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Prim(_))
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    /// Element type of an array type.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Class named by a reference or generic type.
    pub fn class_name(&self) -> Option<&FqName> {
        match self {
            Type::Ref(name) | Type::Generic { base: name, .. } => Some(name),
            _ => None,
        }
    }

    /// JVM descriptor. Generic types erase to their base; `null` erases to
    /// `java.lang.Object`.
    pub fn descriptor(&self) -> String {
        match self {
            Type::Void => "V".to_string(),
            Type::Prim(prim) => prim.descriptor().to_string(),
            Type::Ref(name) | Type::Generic { base: name, .. } => name.descriptor(),
            Type::Array(element) => format!("[{}", element.descriptor()),
            Type::Method(method) => method.descriptor(),
            Type::Null => FqName::new(known::OBJECT).descriptor(),
        }
    }

    /// The name a runtime class object reports for this type: dotted names
    /// for classes, dotted descriptors for arrays, one letter for primitives.
    pub fn runtime_class_name(&self) -> String {
        match self {
            Type::Ref(name) | Type::Generic { base: name, .. } => name.as_str().to_string(),
            _ => self.descriptor().replace('/', "."),
        }
    }
}

impl From<PrimType> for Type {
    fn from(prim: PrimType) -> Self {
        Type::Prim(prim)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Prim(prim) => f.write_str(prim.keyword()),
            Type::Ref(name) => write!(f, "{name}"),
            Type::Array(element) => write!(f, "{element}[]"),
            Type::Method(method) => write!(f, "{}", method.descriptor()),
            Type::Null => f.write_str("null"),
            Type::Generic { base, args } => {
                write!(f, "{base}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
        }
    }
}

/// Argument and return types of a method.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodType {
    pub args: Vec<Type>,
    pub ret: Type,
}

impl MethodType {
    pub fn new(args: Vec<Type>, ret: Type) -> Self {
        MethodType { args, ret }
    }

    /// `(args)ret` descriptor.
    pub fn descriptor(&self) -> String {
        let mut out = String::from("(");
        for arg in &self.args {
            out.push_str(&arg.descriptor());
        }
        out.push(')');
        out.push_str(&self.ret.descriptor());
        out
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        self.ret == Type::Void
    }
}

#[cfg(test)]
mod tests;
