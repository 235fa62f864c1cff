//! Type-directed cast resolution.
//!
//! `cast(text, from, to)` rewrites an already-rendered expression so it
//! holds a `to` value on the target. The primitive table encodes the source
//! platform's narrowing and widening rules on top of the target's single
//! integer type and 64-bit floats. Pairs without a rule are errors; the
//! resolver never guesses.

use hxt_ir::{known, MethodRef, MethodType, PrimType, Type};

use crate::services::NameResolver;

/// A `(from, to)` pair with no translation rule. Types are named by
/// descriptor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported cast from {from} to {to}")]
pub struct UnsupportedCast {
    pub from: String,
    pub to: String,
}

impl UnsupportedCast {
    fn new(from: &Type, to: &Type) -> Self {
        UnsupportedCast {
            from: from.descriptor(),
            to: to.descriptor(),
        }
    }
}

/// Renders `text` (of type `from`) as a value of type `to`.
pub fn cast(
    names: &dyn NameResolver,
    text: &str,
    from: &Type,
    to: &Type,
) -> Result<String, UnsupportedCast> {
    if from == to {
        return Ok(text.to_string());
    }

    match (from, to) {
        (Type::Null, _) => Ok(text.to_string()),
        (Type::Prim(from), Type::Prim(to)) => Ok(cast_primitive(text, *from, *to)),
        (Type::Ref(class), Type::Prim(_)) => match PrimType::from_boxed(class) {
            Some(prim) => {
                let unboxed = format!("({text}).{}()", unbox_method(names, prim));
                cast(names, &unboxed, &Type::Prim(prim), to)
            }
            None => Err(UnsupportedCast::new(from, to)),
        },
        (
            Type::Ref(_) | Type::Array(_) | Type::Generic { .. },
            Type::Ref(_) | Type::Array(_) | Type::Generic { .. },
        ) => {
            if to.class_name().is_some_and(|name| name.as_str() == known::FUNCTION_MARKER) {
                Ok(format!("(HaxeNatives.getFunction({text}))"))
            } else {
                Ok(format!("HaxeNatives.cast2({text}, {})", names.type_tag(to)))
            }
        }
        _ => Err(UnsupportedCast::new(from, to)),
    }
}

fn unbox_method(names: &dyn NameResolver, prim: PrimType) -> String {
    let accessor = MethodRef::new(
        prim.boxed_class(),
        prim.unbox_accessor(),
        MethodType::new(vec![], Type::Prim(prim)),
    );
    names.method_name(&accessor)
}

/// The full 8x8 primitive conversion table.
fn cast_primitive(e: &str, from: PrimType, to: PrimType) -> String {
    use PrimType::{Bool, Byte, Char, Double, Float, Int, Long, Short};

    if from == to {
        return e.to_string();
    }
    match from {
        Bool => match to {
            Long => format!("HaxeNatives.intToLong(({e}) ? 1 : 0)"),
            Float | Double => format!("(({e}) ? 1.0 : 0.0)"),
            Byte | Short | Char | Int | Bool => format!("(({e}) ? 1 : 0)"),
        },
        Byte | Short | Char | Int => match to {
            Long => format!("HaxeNatives.intToLong({e})"),
            Bool => format!("(({e}) != 0)"),
            Char => format!("(({e}) & 0xFFFF)"),
            Short => format!("((({e}) << 16) >> 16)"),
            Byte => format!("((({e}) << 24) >> 24)"),
            Int | Float | Double => format!("({e})"),
        },
        Float | Double => match to {
            Long => format!("HaxeNatives.floatToLong({e})"),
            Int => format!("Std.int({e})"),
            Bool => format!("(Std.int({e}) != 0)"),
            Char => format!("(Std.int({e}) & 0xFFFF)"),
            Short => format!("((Std.int({e}) << 16) >> 16)"),
            Byte => format!("((Std.int({e}) << 24) >> 24)"),
            Float | Double => format!("({e})"),
        },
        Long => match to {
            Int => format!("({e}).low"),
            Bool => format!("(({e}).low != 0)"),
            Char => format!("(({e}).low & 0xFFFF)"),
            Short => format!("((({e}).low << 16) >> 16)"),
            Byte => format!("((({e}).low << 24) >> 24)"),
            Float | Double => format!("HaxeNatives.longToFloat({e})"),
            Long => e.to_string(),
        },
    }
}
