//! Binary and Unary Operators
//!
//! Operators as they appear after bytecode normalization. Comparison
//! instructions that produce -1/0/1 are kept as distinct three-way operators
//! because the target has no native equivalent.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Ushr,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,

    // Three-way compare
    Cmp,
    Lcmp,
    Cmpl,
    Cmpg,
}

impl BinaryOp {
    /// Target operator text. Three-way compares have no symbol of their own
    /// and report their helper name instead.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            // Arithmetic
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            // Bitwise
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Ushr => ">>>",
            // Comparison
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            // Logical
            Self::And => "&&",
            Self::Or => "||",
            // Three-way compare
            Self::Cmp => "cmp",
            Self::Lcmp => "lcmp",
            Self::Cmpl => "cmpl",
            Self::Cmpg => "cmpg",
        }
    }

    /// Helper name for three-way compares, `None` for every other operator.
    pub const fn three_way_helper(self) -> Option<&'static str> {
        match self {
            Self::Cmp | Self::Lcmp | Self::Cmpl | Self::Cmpg => Some(self.as_symbol()),
            _ => None,
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
            Self::BitNot => "~",
        }
    }
}
