//! Shared fixtures for unit tests.

use hxt_ir::{
    known, Body, Class, ClassKind, Expr, FqName, Method, MethodRef, MethodType, Modifiers, Param,
    Program, Stmt, Type,
};

use crate::context::{CodeWriter, EmitCx, Session};
use crate::entry::emit_entry;
use crate::error::Result;
use crate::haxe::class::{emit_class, ClassOutput};
use crate::haxe::expr::emit_expr;
use crate::haxe::stmt::{emit_body, emit_stmt};
use crate::mappings::MappingTable;
use crate::names::HaxeNames;
use crate::options::CodegenOptions;
use crate::pipeline::GeneratedUnit;
use crate::reflection::emit_reflection;

pub(crate) fn mref(class: &str, name: &str, args: Vec<Type>, ret: Type) -> MethodRef {
    MethodRef::new(class, name, MethodType::new(args, ret))
}

pub(crate) fn params(types: &[Type]) -> Vec<Param> {
    types
        .iter()
        .enumerate()
        .map(|(i, ty)| Param::new(format!("p{i}"), ty.clone()))
        .collect()
}

/// A method whose body is `stmts` with no locals.
pub(crate) fn method(name: &str, args: &[Type], ret: Type, modifiers: Modifiers, stmts: Vec<Stmt>) -> Method {
    Method::new(name, params(args), ret, modifiers)
        .with_body(Body::new(Vec::new(), Stmt::Block(stmts)))
}

pub(crate) fn object_class() -> Class {
    Class::new(known::OBJECT, ClassKind::Class)
        .with_method(method(known::CONSTRUCTOR, &[], Type::Void, Modifiers::PUBLIC, vec![]))
        .with_method(Method::new("toString", vec![], Type::string(), Modifiers::PUBLIC))
        .with_method(Method::new("hashCode", vec![], Type::INT, Modifiers::PUBLIC))
}

pub(crate) fn integer_class() -> Class {
    Class::new(known::INTEGER, ClassKind::Class)
        .with_method(Method::new("intValue", vec![], Type::INT, Modifiers::PUBLIC))
}

/// Object, Integer and String.
pub(crate) fn runtime_program(entry: &str) -> Program {
    Program::new(entry)
        .with_class(object_class())
        .with_class(integer_class())
        .with_class(Class::new(known::STRING, ClassKind::Class))
}

/// A program plus the services one pass needs.
pub(crate) struct Fixture {
    pub program: Program,
    pub mappings: MappingTable,
    pub options: CodegenOptions,
}

impl Fixture {
    pub fn new(program: Program) -> Self {
        Fixture {
            program,
            mappings: MappingTable::new(),
            options: CodegenOptions::default().with_parallel(false),
        }
    }

    #[must_use]
    pub fn with_mappings(mut self, mappings: MappingTable) -> Self {
        self.mappings = mappings;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: CodegenOptions) -> Self {
        self.options = options;
        self
    }

    #[expect(clippy::expect_used, reason = "fixture classes are always present")]
    fn in_class<T>(&self, class: &str, f: impl FnOnce(&mut EmitCx<'_>) -> T) -> T {
        let names = HaxeNames::new(&self.program);
        let session = Session::new(&self.program, &names, &self.mappings, &self.options);
        let class = self
            .program
            .class(&FqName::new(class))
            .expect("fixture class exists");
        let mut cx = EmitCx::for_class(session, class);
        f(&mut cx)
    }

    pub fn expr(&self, class: &str, expr: &Expr) -> Result<String> {
        self.in_class(class, |cx| emit_expr(cx, expr))
    }

    /// Expression text plus the classes it touched statically.
    pub fn expr_with_deps(&self, class: &str, expr: &Expr) -> Result<(String, Vec<FqName>)> {
        self.in_class(class, |cx| {
            let text = emit_expr(cx, expr)?;
            Ok((text, cx.leave_method().into_vec()))
        })
    }

    pub fn stmt(&self, class: &str, stmt: &Stmt) -> Result<String> {
        self.in_class(class, |cx| {
            let mut w = CodeWriter::new();
            emit_stmt(cx, &mut w, stmt)?;
            Ok(w.take_output())
        })
    }

    /// Statement text plus every class the emitting class now references.
    #[expect(clippy::expect_used, reason = "fixture classes are always present")]
    pub fn stmt_with_references(&self, class: &str, stmt: &Stmt) -> Result<(String, Vec<FqName>)> {
        let names = HaxeNames::new(&self.program);
        let session = Session::new(&self.program, &names, &self.mappings, &self.options);
        let class = self
            .program
            .class(&FqName::new(class))
            .expect("fixture class exists");
        let mut cx = EmitCx::for_class(session, class);
        let mut w = CodeWriter::new();
        emit_stmt(&mut cx, &mut w, stmt)?;
        Ok((w.take_output(), cx.into_references().into_sorted()))
    }

    /// Full body of `method` as if declared on `class`.
    pub fn body(&self, class: &str, method: &Method) -> Result<String> {
        self.in_class(class, |cx| {
            let mut w = CodeWriter::new();
            if let Some(body) = &method.body {
                emit_body(cx, &mut w, method, body)?;
            }
            Ok(w.take_output())
        })
    }

    #[expect(clippy::expect_used, reason = "fixture classes are always present")]
    pub fn class(&self, class: &str) -> Result<ClassOutput> {
        let names = HaxeNames::new(&self.program);
        let session = Session::new(&self.program, &names, &self.mappings, &self.options);
        let class = self
            .program
            .class(&FqName::new(class))
            .expect("fixture class exists");
        emit_class(session, class)
    }

    pub fn reflection(&self) -> Result<GeneratedUnit> {
        let names = HaxeNames::new(&self.program);
        let session = Session::new(&self.program, &names, &self.mappings, &self.options);
        emit_reflection(session)
    }

    pub fn entry(&self, order: &[FqName]) -> Result<GeneratedUnit> {
        let names = HaxeNames::new(&self.program);
        let session = Session::new(&self.program, &names, &self.mappings, &self.options);
        emit_entry(session, order)
    }
}
