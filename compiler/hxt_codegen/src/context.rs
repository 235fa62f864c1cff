//! Emission state.
//!
//! `Session` is the read-only state shared by every class of a pass.
//! `EmitCx` is created per class and owns the two accumulators: the
//! class's reference set and the current method's init-dependency set.
//! Both follow a create, populate, drain, discard lifecycle.

use rustc_hash::FxHashSet;

use hxt_ir::{Class, FqName, Method, Program, Type};

use crate::error::CodegenError;
use crate::init::InitHooks;
use crate::options::CodegenOptions;
use crate::services::{Mappings, NameResolver};

/// Read-only state of one generation pass.
#[derive(Clone, Copy)]
pub struct Session<'a> {
    pub program: &'a Program,
    pub names: &'a dyn NameResolver,
    pub mappings: &'a dyn Mappings,
    pub options: &'a CodegenOptions,
    pub hooks: &'static dyn InitHooks,
}

impl<'a> Session<'a> {
    pub fn new(
        program: &'a Program,
        names: &'a dyn NameResolver,
        mappings: &'a dyn Mappings,
        options: &'a CodegenOptions,
    ) -> Self {
        Session {
            program,
            names,
            mappings,
            options,
            hooks: options.init_mode.hooks(),
        }
    }
}

/// Classes a type mentions.
#[derive(Debug, Default)]
pub struct References {
    used: FxHashSet<FqName>,
}

impl References {
    pub fn add(&mut self, ty: &Type) {
        match ty {
            Type::Ref(name) => {
                self.used.insert(name.clone());
            }
            Type::Generic { base, args } => {
                self.used.insert(base.clone());
                for arg in args {
                    self.add(arg);
                }
            }
            Type::Array(element) => self.add(element),
            Type::Method(method) => {
                for arg in &method.args {
                    self.add(arg);
                }
                self.add(&method.ret);
            }
            Type::Void | Type::Prim(_) | Type::Null => {}
        }
    }

    pub fn add_class(&mut self, class: &FqName) {
        self.used.insert(class.clone());
    }

    /// Sorted, so output doesn't depend on hash order.
    pub fn into_sorted(self) -> Vec<FqName> {
        let mut used: Vec<FqName> = self.used.into_iter().collect();
        used.sort();
        used
    }
}

/// Classes whose static initializer must run before the current method
/// body, in first-touch order.
#[derive(Debug, Default)]
pub struct InitDeps {
    order: Vec<FqName>,
    seen: FxHashSet<FqName>,
}

impl InitDeps {
    pub fn add(&mut self, class: &FqName) {
        if self.seen.insert(class.clone()) {
            self.order.push(class.clone());
        }
    }

    pub fn as_slice(&self) -> &[FqName] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<FqName> {
        self.order
    }
}

/// Per-class emission context.
pub struct EmitCx<'a> {
    pub session: Session<'a>,
    pub class: &'a Class,
    refs: References,
    deps: InitDeps,
    site: String,
    exits: Vec<ExitScope>,
    temps: usize,
}

/// Innermost target-language construct an emitted `break` leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitScope {
    Loop,
    /// A switch wrapped in `do { } while (false)`. A `continue` aimed at an
    /// outer loop sets `continue_flag` and breaks out instead.
    Switch { continue_flag: Option<String> },
}

impl<'a> EmitCx<'a> {
    pub fn for_class(session: Session<'a>, class: &'a Class) -> Self {
        EmitCx {
            session,
            class,
            refs: References::default(),
            deps: InitDeps::default(),
            site: class.name.to_string(),
            exits: Vec::new(),
            temps: 0,
        }
    }

    #[inline]
    pub fn names(&self) -> &'a dyn NameResolver {
        self.session.names
    }

    #[inline]
    pub fn mappings(&self) -> &'a dyn Mappings {
        self.session.mappings
    }

    #[inline]
    pub fn program(&self) -> &'a Program {
        self.session.program
    }

    /// Starts a method: fresh dependency set, site narrowed to the method.
    pub fn enter_method(&mut self, method: &Method) {
        self.deps = InitDeps::default();
        self.site = format!("{}::{}{}", self.class.name, method.name, method.descriptor());
    }

    /// Ends a method and hands back the dependencies it accumulated.
    pub fn leave_method(&mut self) -> InitDeps {
        self.site = self.class.name.to_string();
        std::mem::take(&mut self.deps)
    }

    /// Records a static touch of `class`. Runtime-provided classes have no
    /// initializer to run.
    pub fn touch_static(&mut self, class: &FqName) {
        self.refs.add_class(class);
        if !self.session.program.class(class).is_some_and(Class::is_native) {
            self.deps.add(class);
        }
    }

    pub fn reference(&mut self, ty: &Type) {
        self.refs.add(ty);
    }

    pub fn reference_class(&mut self, class: &FqName) {
        self.refs.add_class(class);
    }

    pub fn push_exit(&mut self, scope: ExitScope) {
        self.exits.push(scope);
    }

    pub fn pop_exit(&mut self) {
        self.exits.pop();
    }

    pub fn innermost_exit(&self) -> Option<&ExitScope> {
        self.exits.last()
    }

    /// A local name unique within the class.
    pub fn fresh_temp(&mut self, stem: &str) -> String {
        let name = format!("__{stem}{}__", self.temps);
        self.temps += 1;
        name
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn unsupported(&self, what: impl Into<String>) -> CodegenError {
        CodegenError::unsupported(self.site.clone(), what)
    }

    pub fn lookup_failed(&self, what: &'static str, name: impl ToString) -> CodegenError {
        CodegenError::lookup(self.site.clone(), what, name)
    }

    pub fn into_references(self) -> References {
        self.refs
    }
}

/// Indented text buffer.
#[derive(Debug, Default)]
pub struct CodeWriter {
    indent: usize,
    output: String,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn writeln(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.output.push('\t');
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    /// Writes each line of a multi-line text at the current indentation.
    pub fn write_lines(&mut self, text: &str) {
        for line in text.lines() {
            self.writeln(line);
        }
    }

    /// `header {` followed by an indent.
    pub fn open(&mut self, header: &str) {
        self.writeln(&format!("{header} {{"));
        self.indent();
    }

    pub fn close(&mut self) {
        self.dedent();
        self.writeln("}");
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
