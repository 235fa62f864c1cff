//! Constant encoding.
//!
//! The target has one 32-bit integer type, 64-bit floats and no native
//! 64-bit integer, so `long` constants go through `haxe.Int64.make(high,
//! low)` and non-finite floats are rebuilt from their bit patterns.

use std::fmt::Write;

use hxt_ir::Literal;

/// Target text of a constant.
pub fn escape_literal(literal: &Literal) -> String {
    match literal {
        Literal::Null => "null".to_string(),
        Literal::Bool(value) => value.to_string(),
        Literal::Byte(value) => int(i32::from(*value)),
        Literal::Short(value) => int(i32::from(*value)),
        Literal::Char(value) => int(i32::from(*value)),
        Literal::Int(value) => int(*value),
        Literal::Long(value) => long(*value),
        Literal::Float(bits) => {
            let value = f32::from_bits(*bits);
            if value.is_finite() {
                float(f64::from(value))
            } else {
                #[expect(clippy::cast_possible_wrap, reason = "bit pattern reinterpretation")]
                let bits = *bits as i32;
                format!("HaxeNatives.intBitsToFloat({})", int(bits))
            }
        }
        Literal::Double(bits) => {
            let value = f64::from_bits(*bits);
            if value.is_finite() {
                float(value)
            } else {
                #[expect(clippy::cast_possible_wrap, reason = "bit pattern reinterpretation")]
                let bits = *bits as i64;
                format!("HaxeNatives.longBitsToDouble({})", long(bits))
            }
        }
        Literal::String(value) => format!("HaxeNatives.str({})", quote(value)),
    }
}

/// `i32::MIN` has no literal form on some targets.
pub fn int(value: i32) -> String {
    if value == i32::MIN {
        "(-2147483647 - 1)".to_string()
    } else {
        value.to_string()
    }
}

/// `haxe.Int64.make(high, low)` with both words as signed 32-bit values.
pub fn long(value: i64) -> String {
    #[expect(clippy::cast_possible_truncation, reason = "splitting into words")]
    let (high, low) = ((value >> 32) as i32, value as i32);
    format!("haxe.Int64.make({}, {})", int(high), int(low))
}

/// Finite float; always carries a decimal point or exponent.
fn float(value: f64) -> String {
    let text = format!("{value:?}");
    if text.contains(['.', 'e', 'E']) {
        text
    } else {
        text + ".0"
    }
}

/// Double-quoted target string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Quoted string, or `null` when absent.
pub fn quote_opt(value: Option<&str>) -> String {
    value.map_or_else(|| "null".to_string(), quote)
}
