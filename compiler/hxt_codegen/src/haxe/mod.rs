//! Haxe emitters.
//!
//! ```text
//! Class ──► emit_class ──► emit_body ──► emit_stmt ──► emit_expr ──► cast
//! ```
//!
//! Expressions render to a single fragment; statements and classes write
//! lines into a [`CodeWriter`](crate::context::CodeWriter).

pub mod cast;
pub mod class;
pub mod expr;
pub mod literal;
pub mod stmt;

/// Per-method slot holding the exception bound by a catch-all.
pub const EXCEPTION_SLOT: &str = "__exception__";
/// Catch variable the slot is filled from.
pub const CATCH_VAR: &str = "__i__exception__";
