//! hxt IR - Resolved Program Model
//!
//! This crate contains the read-only program model consumed by the Haxe
//! backend:
//! - Fully-qualified names and JVM descriptors
//! - Types (8 primitive kinds, references, arrays, method types, null, generics)
//! - Statement and expression trees (closed tagged unions)
//! - Classes, methods, fields and annotations
//! - A read-only visitor for tree walks
//!
//! Everything here is built upstream (parser, resolver, type checker) and
//! consumed once per generation pass. Nothing in this crate performs I/O.
//!
//! # Design Philosophy
//!
//! - **Closed variants**: every statement/expression/type kind is an enum
//!   variant, so consumers match exhaustively instead of testing types.
//! - **Descriptors are derived**: method and field descriptors are computed
//!   from the structured types, never stored as free-form strings.
//!
//! Types that contain floats store them as raw bits so literals stay `Eq + Hash`.

pub mod ast;
pub mod known;
mod literal;
mod modifiers;
mod name;
mod program;
mod types;
pub mod visitor;

pub use ast::{
    BinaryOp, CallKind, Expr, FieldRef, Local, MethodRef, Param, Stmt, SwitchCase, UnaryOp,
};
pub use literal::Literal;
pub use modifiers::Modifiers;
pub use name::FqName;
pub use program::{
    Annotation, AnnotationRegistry, AnnotationValue, Body, Class, ClassKind, ClassOrigin, Field,
    Method, Program,
};
pub use types::{MethodType, PrimType, Type};
