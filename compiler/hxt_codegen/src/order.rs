//! Static initialization order.
//!
//! A class depends on its supertype, its interfaces, and every class whose
//! static member it touches or which it instantiates. The order is a DFS
//! post-order from the entry class, so each class comes after everything it
//! depends on. An edge back to a class still being visited closes a cycle;
//! it is skipped and reported instead of failing the pass.

use rustc_hash::{FxHashMap, FxHashSet};

use hxt_ir::visitor::{walk_expr, walk_stmt, Visitor};
use hxt_ir::{CallKind, Class, Expr, FieldRef, FqName, MethodRef, Program, Stmt};

/// Initialization sequence plus the cycle edges skipped to produce it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitOrder {
    /// Reachable generated classes, dependencies first.
    pub order: Vec<FqName>,
    /// `(from, to)` edges ignored because `to` was still being visited.
    pub broken_edges: Vec<(FqName, FqName)>,
}

/// Collects the owners of every static touch in a method body.
struct StaticTouches<'p> {
    program: &'p Program,
    found: Vec<FqName>,
}

impl StaticTouches<'_> {
    fn field(&mut self, field: &FieldRef) {
        let owner = self
            .program
            .field(&field.class, &field.name)
            .map_or_else(|| field.class.clone(), |(owner, _)| owner.name.clone());
        self.found.push(owner);
    }

    fn method(&mut self, method: &MethodRef) {
        let owner = self
            .program
            .method_ref(method)
            .map_or_else(|| method.class.clone(), |(owner, _)| owner.name.clone());
        self.found.push(owner);
    }
}

impl<'ast> Visitor<'ast> for StaticTouches<'_> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::SetStaticField { field, .. } => self.field(field),
            Stmt::SetNewWithConstructor { target, .. } => self.found.push(target.clone()),
            _ => {}
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::StaticField(field) => self.field(field),
            Expr::Call {
                kind: CallKind::Static,
                method,
                ..
            } => self.method(method),
            Expr::New(class) => self.found.push(class.clone()),
            // The adapter closure calls a static target directly.
            Expr::MethodClass { target, .. }
                if self
                    .program
                    .method_ref(target)
                    .is_some_and(|(_, method)| method.is_static()) =>
            {
                self.method(target);
            }
            _ => {}
        }
        walk_expr(self, expr);
    }
}

/// Direct dependencies of `class`: supertype, interfaces, then static
/// touches in first-appearance order. Never contains `class` itself.
pub fn static_dependencies(program: &Program, class: &Class) -> Vec<FqName> {
    let mut touches = StaticTouches {
        program,
        found: class.parents().cloned().collect(),
    };
    for method in &class.methods {
        if let Some(body) = &method.body {
            touches.visit_stmt(&body.stmt);
        }
    }

    let mut seen = FxHashSet::default();
    touches
        .found
        .into_iter()
        .filter(|dep| *dep != class.name && seen.insert(dep.clone()))
        .collect()
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    OnStack,
    Done,
}

struct Frame {
    class: FqName,
    deps: Vec<FqName>,
    next: usize,
}

impl Frame {
    fn new(program: &Program, class: &Class) -> Self {
        Frame {
            class: class.name.clone(),
            deps: static_dependencies(program, class),
            next: 0,
        }
    }
}

/// Computes the initialization order of everything reachable from `entry`.
/// Runtime-provided classes are walked through but left out of the result.
pub fn init_order(program: &Program, entry: &FqName) -> InitOrder {
    let mut result = InitOrder::default();
    let Some(root) = program.class(entry) else {
        return result;
    };

    let mut marks: FxHashMap<FqName, Mark> = FxHashMap::default();
    marks.insert(root.name.clone(), Mark::OnStack);
    let mut stack = vec![Frame::new(program, root)];

    while let Some(frame) = stack.last_mut() {
        let Some(dep) = frame.deps.get(frame.next).cloned() else {
            if let Some(done) = stack.pop() {
                marks.insert(done.class.clone(), Mark::Done);
                if !program.class(&done.class).is_some_and(Class::is_native) {
                    result.order.push(done.class);
                }
            }
            continue;
        };
        frame.next += 1;

        match marks.get(&dep) {
            Some(Mark::Done) => {}
            Some(Mark::OnStack) => {
                tracing::warn!(
                    from = %frame.class,
                    to = %dep,
                    "static init cycle, dependency edge ignored"
                );
                result.broken_edges.push((frame.class.clone(), dep));
            }
            None => {
                if let Some(class) = program.class(&dep) {
                    marks.insert(dep, Mark::OnStack);
                    stack.push(Frame::new(program, class));
                }
            }
        }
    }

    tracing::debug!(
        classes = result.order.len(),
        broken = result.broken_edges.len(),
        "computed static init order"
    );
    result
}
