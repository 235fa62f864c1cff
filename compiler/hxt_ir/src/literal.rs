//! Constant values.

use crate::types::Type;

/// A constant of the source platform.
///
/// Floating-point values are stored as IEEE bit patterns, which keeps NaN
/// payloads and negative zero intact and lets the type be `Eq + Hash`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Char(u16),
    Int(i32),
    Long(i64),
    Float(u32),
    Double(u64),
    String(String),
}

impl Literal {
    pub fn float(value: f32) -> Self {
        Literal::Float(value.to_bits())
    }

    pub fn double(value: f64) -> Self {
        Literal::Double(value.to_bits())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Literal::String(value.into())
    }

    /// Type of the constant.
    pub fn ty(&self) -> Type {
        match self {
            Literal::Null => Type::Null,
            Literal::Bool(_) => Type::BOOL,
            Literal::Byte(_) => Type::BYTE,
            Literal::Short(_) => Type::SHORT,
            Literal::Char(_) => Type::CHAR,
            Literal::Int(_) => Type::INT,
            Literal::Long(_) => Type::LONG,
            Literal::Float(_) => Type::FLOAT,
            Literal::Double(_) => Type::DOUBLE,
            Literal::String(_) => Type::string(),
        }
    }
}
