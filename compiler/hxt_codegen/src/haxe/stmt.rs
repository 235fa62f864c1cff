//! Statement emission.

use hxt_ir::visitor::{walk_stmt, Visitor};
use hxt_ir::{Body, Expr, FqName, Local, Method, MethodRef, Stmt, SwitchCase};

use super::expr::{emit_args, emit_expr};
use super::literal::escape_literal;
use super::{CATCH_VAR, EXCEPTION_SLOT};
use crate::context::{CodeWriter, EmitCx, ExitScope};
use crate::error::Result;
use crate::template;

/// Emits `stmt` into `w`.
pub fn emit_stmt(cx: &mut EmitCx<'_>, w: &mut CodeWriter, stmt: &Stmt) -> Result<()> {
    match stmt {
        Stmt::Nop => {}
        Stmt::If {
            cond,
            then,
            otherwise,
        } => {
            let cond = emit_expr(cx, cond)?;
            w.open(&format!("if ({cond})"));
            emit_stmt(cx, w, then)?;
            w.close();
            if let Some(otherwise) = otherwise {
                w.open("else");
                emit_stmt(cx, w, otherwise)?;
                w.close();
            }
        }
        Stmt::Return(None) => w.writeln("return;"),
        Stmt::Return(Some(value)) => {
            let value = emit_expr(cx, value)?;
            w.writeln(&format!("return {value};"));
        }
        Stmt::SetLocal { local, expr } => {
            let value = emit_expr(cx, expr)?;
            let from = expr.ty();
            let value = match cx.mappings().class_adaptor(&from, &local.ty) {
                Some(adaptor) if from != local.ty => {
                    cx.reference_class(&FqName::new(adaptor));
                    format!("new {adaptor}({value})")
                }
                _ => value,
            };
            w.writeln(&format!("{} = {value};", cx.names().local_name(&local.name)));
        }
        Stmt::SetNewWithConstructor {
            local,
            target,
            constructor,
            args,
        } => emit_construction(cx, w, local, target, constructor, args)?,
        Stmt::SetArray {
            array,
            index,
            value,
        } => {
            let array = emit_expr(cx, array)?;
            let index = emit_expr(cx, index)?;
            let value = emit_expr(cx, value)?;
            w.writeln(&format!("{array}.set({index}, {value});"));
        }
        Stmt::SetStaticField { field, expr } => {
            let (owner, _) = cx
                .program()
                .field(&field.class, &field.name)
                .ok_or_else(|| cx.lookup_failed("field", field))?;
            let owner = owner.name.clone();
            cx.touch_static(&owner);
            let value = emit_expr(cx, expr)?;
            let mut resolved = field.clone();
            resolved.class = owner;
            w.writeln(&format!("{} = {value};", cx.names().static_field_text(&resolved)));
        }
        Stmt::SetInstanceField {
            object,
            field,
            expr,
        } => {
            let object = emit_expr(cx, object)?;
            let value = emit_expr(cx, expr)?;
            w.writeln(&format!("{object}.{} = {value};", cx.names().field_name(field)));
        }
        Stmt::Expr(expr) => {
            let expr = emit_expr(cx, expr)?;
            w.writeln(&format!("{expr};"));
        }
        Stmt::Block(stmts) => {
            for stmt in stmts {
                emit_stmt(cx, w, stmt)?;
            }
        }
        Stmt::Label(name) => w.writeln(&format!("{name}:;")),
        Stmt::Break => w.writeln("break;"),
        Stmt::Continue => emit_continue(cx, w),
        Stmt::While { cond, body } => {
            let cond = emit_expr(cx, cond)?;
            w.open(&format!("while ({cond})"));
            cx.push_exit(ExitScope::Loop);
            emit_stmt(cx, w, body)?;
            cx.pop_exit();
            w.close();
        }
        Stmt::Switch {
            subject,
            cases,
            default,
        } => emit_switch(cx, w, subject, cases, default)?,
        Stmt::TryCatch { body, catch } => {
            w.open("try");
            emit_stmt(cx, w, body)?;
            w.close();
            w.open(&format!("catch ({CATCH_VAR}:Dynamic)"));
            w.writeln(&format!("{EXCEPTION_SLOT} = {CATCH_VAR};"));
            emit_stmt(cx, w, catch)?;
            w.close();
        }
        Stmt::Throw(value) => {
            let value = emit_expr(cx, value)?;
            w.writeln(&format!("throw {value};"));
        }
        Stmt::Rethrow => w.writeln(&format!("HaxeNatives.rethrow({EXCEPTION_SLOT});")),
        // Single-threaded target.
        Stmt::MonitorEnter(_) => w.writeln("// MONITOR_ENTER"),
        Stmt::MonitorExit(_) => w.writeln("// MONITOR_EXIT"),
    }
    Ok(())
}

fn emit_continue(cx: &EmitCx<'_>, w: &mut CodeWriter) {
    match cx.innermost_exit() {
        Some(ExitScope::Switch {
            continue_flag: Some(flag),
        }) => {
            w.writeln(&format!("{flag} = true;"));
            w.writeln("break;");
        }
        _ => w.writeln("continue;"),
    }
}

/// Whether control can reach the statement after `stmt`.
fn completes_normally(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(_) | Stmt::Throw(_) | Stmt::Rethrow | Stmt::Break | Stmt::Continue => false,
        Stmt::Block(stmts) => stmts.iter().all(completes_normally),
        Stmt::If {
            then,
            otherwise: Some(otherwise),
            ..
        } => completes_normally(then) || completes_normally(otherwise),
        Stmt::TryCatch { body, catch } => completes_normally(body) || completes_normally(catch),
        _ => true,
    }
}

/// A trailing `break` only ends the case, which target cases do anyway.
fn strip_tail_break(stmt: Stmt) -> Stmt {
    match stmt {
        Stmt::Break => Stmt::Nop,
        Stmt::Block(mut stmts) => {
            if let Some(last) = stmts.pop() {
                stmts.push(strip_tail_break(last));
            }
            Stmt::Block(stmts)
        }
        other => other,
    }
}

/// The first body followed by every body it falls into, up to and
/// including the first one that exits.
fn fall_through<'s>(bodies: impl Iterator<Item = &'s Stmt>) -> Stmt {
    let mut joined = Vec::new();
    for body in bodies {
        joined.push(body.clone());
        if !completes_normally(body) {
            break;
        }
    }
    strip_tail_break(Stmt::Block(joined))
}

/// Exits that leave the switch being lowered: breaks outside nested loops
/// and switches, continues outside nested loops.
#[derive(Default)]
struct SwitchExits {
    nested_switches: usize,
    breaks: bool,
    continues: bool,
}

impl<'ast> Visitor<'ast> for SwitchExits {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::While { .. } => {}
            Stmt::Switch { .. } => {
                self.nested_switches += 1;
                walk_stmt(self, stmt);
                self.nested_switches -= 1;
            }
            Stmt::Break => self.breaks |= self.nested_switches == 0,
            Stmt::Continue => self.continues = true,
            _ => walk_stmt(self, stmt),
        }
    }
}

/// Target cases never fall through, so each case gets the bodies it falls
/// into appended. A break left anywhere but the tail needs a construct to
/// leave, so the switch is then wrapped in `do { } while (false)`.
fn emit_switch(
    cx: &mut EmitCx<'_>,
    w: &mut CodeWriter,
    subject: &Expr,
    cases: &[SwitchCase],
    default: &Stmt,
) -> Result<()> {
    let subject = emit_expr(cx, subject)?;
    let arms: Vec<(i32, Stmt)> = cases
        .iter()
        .enumerate()
        .map(|(i, case)| {
            let rest = cases[i..].iter().map(|later| &later.body);
            (case.value, fall_through(rest.chain(std::iter::once(default))))
        })
        .collect();
    let default = strip_tail_break(default.clone());

    let mut exits = SwitchExits::default();
    for (_, body) in &arms {
        exits.visit_stmt(body);
    }
    exits.visit_stmt(&default);

    let wrapped = exits.breaks;
    let continue_flag = (wrapped && exits.continues).then(|| cx.fresh_temp("continue"));
    if wrapped {
        if let Some(flag) = &continue_flag {
            w.writeln(&format!("var {flag}:Bool = false;"));
        }
        w.open("do");
        cx.push_exit(ExitScope::Switch {
            continue_flag: continue_flag.clone(),
        });
    }

    w.open(&format!("switch ({subject})"));
    for (value, body) in &arms {
        w.writeln(&format!("case {value}:"));
        w.indent();
        emit_stmt(cx, w, body)?;
        w.dedent();
    }
    w.writeln("default:");
    w.indent();
    emit_stmt(cx, w, &default)?;
    w.dedent();
    w.close();

    if wrapped {
        cx.pop_exit();
        w.dedent();
        w.writeln("} while (false);");
        if let Some(flag) = continue_flag {
            w.open(&format!("if ({flag})"));
            emit_continue(cx, w);
            w.close();
        }
    }
    Ok(())
}

fn emit_construction(
    cx: &mut EmitCx<'_>,
    w: &mut CodeWriter,
    local: &Local,
    target: &FqName,
    constructor: &MethodRef,
    args: &[Expr],
) -> Result<()> {
    let class = cx
        .program()
        .class(target)
        .ok_or_else(|| cx.lookup_failed("class", target))?;
    cx.reference_class(target);

    let local = cx.names().local_name(&local.name);
    let class_name = cx.names().class_name(target);
    let args = emit_args(cx, args)?;

    if class.is_native() {
        w.writeln(&format!("{local} = new {class_name}({args});"));
    } else if let Some(replacement) = cx.mappings().inline_template(constructor) {
        let text = template::substitute(replacement, '@', &[("args", &args)]);
        w.writeln(&format!("{local} = {text};"));
    } else {
        w.writeln(&format!("{local} = new {class_name}();"));
        w.writeln(&format!(
            "{local}.{}({args});",
            cx.names().method_name(constructor)
        ));
    }
    Ok(())
}

/// Whether a body contains a catch handler and therefore needs the
/// exception slot.
struct FindsTryCatch {
    found: bool,
}

impl<'ast> Visitor<'ast> for FindsTryCatch {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if matches!(stmt, Stmt::TryCatch { .. }) {
            self.found = true;
        }
        if !self.found {
            walk_stmt(self, stmt);
        }
    }
}

/// Emits a full method body: local declarations, the init prologue, then
/// the statements.
pub fn emit_body(cx: &mut EmitCx<'_>, w: &mut CodeWriter, method: &Method, body: &Body) -> Result<()> {
    cx.enter_method(method);
    let mut inner = CodeWriter::new();
    emit_stmt(cx, &mut inner, &body.stmt)?;
    let deps = cx.leave_method();

    let names = cx.names();
    for local in &body.locals {
        cx.reference(&local.ty);
        w.writeln(&format!(
            "var {}:{} = {};",
            names.local_name(&local.name),
            names.type_tag(&local.ty),
            escape_literal(&names.default_value(&local.ty))
        ));
    }

    let mut finder = FindsTryCatch { found: false };
    finder.visit_stmt(&body.stmt);
    if finder.found {
        w.writeln(&format!("var {EXCEPTION_SLOT}:Dynamic = null;"));
    }

    cx.session.hooks.static_touch(w, names, deps.as_slice());
    w.write_lines(&inner.take_output());
    Ok(())
}
