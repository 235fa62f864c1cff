//! Read-only tree walker.
//!
//! Default implementations call the `walk_*` functions, which traverse
//! children in source order. Override `visit_*` to act on specific nodes and
//! call the matching `walk_*` to keep descending.
//!
//! # Example
//!
//! ```text
//! struct CountCalls {
//!     count: usize,
//! }
//!
//! impl<'ast> Visitor<'ast> for CountCalls {
//!     fn visit_expr(&mut self, expr: &'ast Expr) {
//!         if let Expr::Call { .. } = expr {
//!             self.count += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```

use crate::ast::{CallKind, Expr, Stmt};

pub trait Visitor<'ast> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Nop | Stmt::Label(_) | Stmt::Break | Stmt::Continue | Stmt::Rethrow => {}

        Stmt::If {
            cond,
            then,
            otherwise,
        } => {
            visitor.visit_expr(cond);
            visitor.visit_stmt(then);
            if let Some(otherwise) = otherwise {
                visitor.visit_stmt(otherwise);
            }
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::SetLocal { expr, .. }
        | Stmt::SetStaticField { expr, .. }
        | Stmt::Expr(expr)
        | Stmt::Throw(expr)
        | Stmt::MonitorEnter(expr)
        | Stmt::MonitorExit(expr) => visitor.visit_expr(expr),
        Stmt::SetNewWithConstructor { args, .. } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Stmt::SetArray {
            array,
            index,
            value,
        } => {
            visitor.visit_expr(array);
            visitor.visit_expr(index);
            visitor.visit_expr(value);
        }
        Stmt::SetInstanceField { object, expr, .. } => {
            visitor.visit_expr(object);
            visitor.visit_expr(expr);
        }
        Stmt::Block(stmts) => {
            for stmt in stmts {
                visitor.visit_stmt(stmt);
            }
        }
        Stmt::While { cond, body } => {
            visitor.visit_expr(cond);
            visitor.visit_stmt(body);
        }
        Stmt::Switch {
            subject,
            cases,
            default,
        } => {
            visitor.visit_expr(subject);
            for case in cases {
                visitor.visit_stmt(&case.body);
            }
            visitor.visit_stmt(default);
        }
        Stmt::TryCatch { body, catch } => {
            visitor.visit_stmt(body);
            visitor.visit_stmt(catch);
        }
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match expr {
        // Leaves
        Expr::This(_)
        | Expr::Literal(_)
        | Expr::Param(_)
        | Expr::Local(_)
        | Expr::StaticField(_)
        | Expr::New(_)
        | Expr::ClassLiteral(_)
        | Expr::CaughtException(_)
        | Expr::MethodClass { .. } => {}

        // Single child
        Expr::Unary { operand: inner, .. }
        | Expr::InstanceField { object: inner, .. }
        | Expr::ArrayLength(inner)
        | Expr::Cast { expr: inner, .. }
        | Expr::InstanceOf { expr: inner, .. } => visitor.visit_expr(inner),

        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::ArrayElement { array, index } => {
            visitor.visit_expr(array);
            visitor.visit_expr(index);
        }
        Expr::Call { kind, args, .. } => {
            if let CallKind::Instance(receiver) = kind {
                visitor.visit_expr(receiver);
            }
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::NewArray { counts, .. } => {
            for count in counts {
                visitor.visit_expr(count);
            }
        }
    }
}
