//! Expression emission.
//!
//! Each expression renders to one fragment without a terminator. Integer
//! results are post-processed by result type so arithmetic wraps the way
//! the source platform's fixed-width types do.

use hxt_ir::{BinaryOp, CallKind, Expr, FieldRef, MethodRef, Param, PrimType, Type};

use super::cast::cast;
use super::literal::{escape_literal, quote};
use super::EXCEPTION_SLOT;
use crate::context::EmitCx;
use crate::error::{CodegenError, Result};
use crate::services::Accessor;
use crate::template;

/// Renders `expr`.
pub fn emit_expr(cx: &mut EmitCx<'_>, expr: &Expr) -> Result<String> {
    match expr {
        Expr::This(_) => Ok("this".to_string()),
        Expr::Literal(literal) => Ok(escape_literal(literal)),
        Expr::Param(param) => Ok(cx.names().local_name(&param.name)),
        Expr::Local(local) => Ok(cx.names().local_name(&local.name)),
        Expr::Unary { op, operand, ty } => {
            let operand = emit_expr(cx, operand)?;
            Ok(wrap_int_result(format!("{}({operand})", op.as_symbol()), ty))
        }
        Expr::Binary {
            op,
            left,
            right,
            ty,
        } => emit_binary(cx, *op, left, right, ty),
        Expr::Call { kind, method, args } => emit_call(cx, kind, method, args),
        Expr::InstanceField { object, field } => {
            let object = emit_expr(cx, object)?;
            Ok(format!("{object}.{}", cx.names().field_name(field)))
        }
        Expr::StaticField(field) => {
            let field = resolve_static_field(cx, field)?;
            Ok(cx.names().static_field_text(&field))
        }
        Expr::ArrayLength(array) => Ok(format!("{}.length", emit_expr(cx, array)?)),
        Expr::ArrayElement { array, index } => {
            let array = emit_expr(cx, array)?;
            let index = emit_expr(cx, index)?;
            Ok(format!("{array}.get({index})"))
        }
        Expr::Cast { expr, to } => {
            let from = expr.ty();
            cx.reference(&from);
            cx.reference(to);
            let text = emit_expr(cx, expr)?;
            cast(cx.names(), &text, &from, to).map_err(|err| CodegenError::from_cast(cx.site(), err))
        }
        Expr::New(class) => {
            cx.reference_class(class);
            Ok(format!("new {}()", cx.names().class_name(class)))
        }
        Expr::NewArray { ty, counts } => emit_new_array(cx, ty, counts),
        Expr::InstanceOf { expr, check } => {
            cx.reference(check);
            let text = emit_expr(cx, expr)?;
            Ok(format!("Std.is({text}, {})", cx.names().type_tag(check)))
        }
        Expr::ClassLiteral(ty) => {
            cx.reference(ty);
            Ok(format!(
                "HaxeNatives.resolveClass({})",
                quote(&ty.runtime_class_name())
            ))
        }
        Expr::CaughtException(_) => Ok(EXCEPTION_SLOT.to_string()),
        Expr::MethodClass {
            interface_method,
            target,
        } => emit_method_class(cx, interface_method, target),
    }
}

/// Clamps an integer-typed result to its declared width.
fn wrap_int_result(text: String, ty: &Type) -> String {
    match ty.as_prim() {
        Some(PrimType::Int) => format!("(({text}) | 0)"),
        Some(PrimType::Char) => format!("(({text}) & 0xFFFF)"),
        Some(PrimType::Short) => format!("((({text}) << 16) >> 16)"),
        Some(PrimType::Byte) => format!("((({text}) << 24) >> 24)"),
        _ => text,
    }
}

fn emit_binary(
    cx: &mut EmitCx<'_>,
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    ty: &Type,
) -> Result<String> {
    let l = emit_expr(cx, left)?;
    let r = emit_expr(cx, right)?;

    if let Some(helper) = op.three_way_helper() {
        return Ok(format!("HaxeNatives.{helper}({l}, {r})"));
    }

    let int_like = ty.as_prim().is_some_and(PrimType::is_int_like);
    match op {
        // Truncates toward zero; already a valid 32-bit value.
        BinaryOp::Div if int_like => {
            let quotient = format!("Std.int({l} / {r})");
            if *ty == Type::INT {
                Ok(quotient)
            } else {
                Ok(wrap_int_result(quotient, ty))
            }
        }
        // A double-precision product loses the low bits before wrapping.
        BinaryOp::Mul if *ty == Type::INT => Ok(format!("HaxeNatives.imul({l}, {r})")),
        _ => {
            let text = format!("{l} {} {r}", op.as_symbol());
            if int_like {
                Ok(wrap_int_result(text, ty))
            } else {
                Ok(format!("({text})"))
            }
        }
    }
}

/// Resolves a static field to its declaring class and records the touch.
fn resolve_static_field(cx: &mut EmitCx<'_>, field: &FieldRef) -> Result<FieldRef> {
    let (owner, _) = cx
        .program()
        .field(&field.class, &field.name)
        .ok_or_else(|| cx.lookup_failed("field", field))?;
    let owner = owner.name.clone();
    cx.touch_static(&owner);
    Ok(FieldRef::new(owner, field.name.clone(), field.ty.clone()))
}

pub(crate) fn emit_args(cx: &mut EmitCx<'_>, args: &[Expr]) -> Result<String> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        out.push(emit_expr(cx, arg)?);
    }
    Ok(out.join(", "))
}

fn uc_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn emit_call(
    cx: &mut EmitCx<'_>,
    kind: &CallKind,
    method: &MethodRef,
    args: &[Expr],
) -> Result<String> {
    // Arrays are wrapper objects: their inherited methods live in helpers.
    if let CallKind::Instance(receiver) = kind {
        if receiver.ty().is_array() {
            let mut parts = vec![emit_expr(cx, receiver)?];
            for arg in args {
                parts.push(emit_expr(cx, arg)?);
            }
            return Ok(format!(
                "HaxeNatives.array{}({})",
                uc_first(&method.name),
                parts.join(", ")
            ));
        }
    }

    let (owner, _) = cx
        .program()
        .method_ref(method)
        .ok_or_else(|| cx.lookup_failed("method", method))?;
    let owner = owner.name.clone();

    let base = match kind {
        CallKind::Static => {
            cx.touch_static(&owner);
            cx.names().static_owner(&owner)
        }
        CallKind::Super => "super".to_string(),
        CallKind::Instance(receiver) => emit_expr(cx, receiver)?,
    };
    let args = emit_args(cx, args)?;

    let mappings = cx.mappings();
    if let Some(replacement) = mappings.inline_template(method) {
        return Ok(template::substitute(
            replacement,
            '@',
            &[("obj", &base), ("args", &args)],
        ));
    }
    match mappings.accessor(method) {
        Some(Accessor::Getter(member)) if member.contains('$') => Ok(member.replace('$', &base)),
        Some(Accessor::Getter(member)) => Ok(format!("{base}.{member}")),
        Some(Accessor::Setter(member)) => Ok(format!("{base}.{member} = {args}")),
        None => Ok(format!("{base}.{}({args})", cx.names().method_name(method))),
    }
}

fn emit_new_array(cx: &mut EmitCx<'_>, ty: &Type, counts: &[Expr]) -> Result<String> {
    let [count] = counts else {
        return Err(cx.unsupported(format!(
            "{}-dimensional array creation of {ty}",
            counts.len()
        )));
    };
    let Some(element) = ty.element_type() else {
        return Err(cx.unsupported(format!("array creation of non-array type {ty}")));
    };
    cx.reference(element);
    let count = emit_expr(cx, count)?;
    if element.is_primitive() {
        Ok(format!("new {}({count})", cx.names().type_tag(ty)))
    } else {
        Ok(format!(
            "new HaxeArray({count}, {})",
            quote(&ty.runtime_class_name())
        ))
    }
}

/// Wraps a method in the interface's functional adapter. The closure takes
/// the interface's parameters, casts them to the target's declared types,
/// and casts the result back to the interface's return type.
fn emit_method_class(
    cx: &mut EmitCx<'_>,
    interface_method: &MethodRef,
    target: &MethodRef,
) -> Result<String> {
    let interface = cx
        .program()
        .class(&interface_method.class)
        .ok_or_else(|| cx.lookup_failed("interface", &interface_method.class))?;
    if interface.is_native() || interface.functional_method().is_none() {
        return Err(cx.unsupported(format!(
            "method reference to {}, which has no lambda adapter",
            interface.name
        )));
    }
    let (owner, declared) = cx
        .program()
        .method_ref(target)
        .ok_or_else(|| cx.lookup_failed("method", target))?;
    let names = cx.names();

    let expected = target.ty.args.len() + usize::from(!declared.is_static());
    if interface_method.ty.args.len() != expected {
        return Err(cx.unsupported(format!(
            "method reference {target} takes {expected} arguments, {interface_method} passes {}",
            interface_method.ty.args.len()
        )));
    }

    let params: Vec<Param> = interface_method
        .ty
        .args
        .iter()
        .enumerate()
        .map(|(i, ty)| Param::new(format!("p{i}"), ty.clone()))
        .collect();
    let mut incoming = params.iter().cloned().map(Expr::Param);

    let call = if declared.is_static() {
        let args = incoming
            .zip(&target.ty.args)
            .map(|(arg, ty)| Expr::cast(arg, ty.clone()))
            .collect();
        Expr::static_call(target.clone(), args)
    } else {
        let receiver = incoming
            .next()
            .ok_or_else(|| cx.unsupported(format!("method reference {target} without a receiver")))?;
        let receiver = Expr::cast(receiver, Type::Ref(owner.name.clone()));
        let args = incoming
            .zip(&target.ty.args)
            .map(|(arg, ty)| Expr::cast(arg, ty.clone()))
            .collect();
        Expr::instance_call(receiver, target.clone(), args)
    };

    let body = if interface_method.ty.is_void() {
        format!("{};", emit_expr(cx, &call)?)
    } else {
        let result = Expr::cast(call, interface_method.ty.ret.clone());
        format!("return {};", emit_expr(cx, &result)?)
    };

    cx.reference_class(&interface_method.class);
    let signature = params
        .iter()
        .map(|param| format!("{}:{}", names.local_name(&param.name), names.type_tag(&param.ty)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "new {}(function({signature}):{} {{ {body} }})",
        names.lambda_name(&interface_method.class),
        names.type_tag(&interface_method.ty.ret)
    ))
}
