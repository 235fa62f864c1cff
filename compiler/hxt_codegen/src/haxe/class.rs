//! Class emission.
//!
//! One source class yields one unit, plus two companion units for an
//! interface: `X__IFields` holding its statics and, for single-method
//! interfaces, the `X__Lambda` closure adapter.

use hxt_ir::known::{self, annotations};
use hxt_ir::{Class, Field, FqName, Method};

use super::literal::{escape_literal, quote};
use super::stmt::emit_body;
use crate::context::{CodeWriter, EmitCx, Session};
use crate::error::Result;
use crate::pipeline::GeneratedUnit;

/// Units generated for one class and the classes they mention.
#[derive(Debug)]
pub struct ClassOutput {
    pub units: Vec<GeneratedUnit>,
    pub references: Vec<FqName>,
}

/// Emits every unit of `class`.
pub fn emit_class(session: Session<'_>, class: &Class) -> Result<ClassOutput> {
    let mut cx = EmitCx::for_class(session, class);
    let names = session.names;
    let generated = names.generated_name(&class.name);

    let mut w = CodeWriter::new();
    write_package(&mut w, generated.package());
    if class.is_abstract() {
        w.writeln("// ABSTRACT");
    }
    let header = declaration(&mut cx, class, generated.simple_name());
    w.open(&header);

    if class.is_interface() {
        emit_native_members(&cx, &mut w);
        for method in class.abstract_methods().filter(|method| !method.is_override) {
            let signature = signature(&mut cx, class, method);
            w.writeln(&format!("function {signature};"));
        }
    } else {
        let execute = function_entry(&cx)?;
        emit_constructor(&cx, &mut w, execute.as_deref());
        emit_native_members(&cx, &mut w);
        if execute.is_some() {
            w.writeln(&format!("public var {EXECUTE_FIELD}:haxe.Constraints.Function;"));
        }
        for field in &class.fields {
            emit_field(&mut cx, &mut w, field);
        }
        for method in &class.methods {
            emit_method(&mut cx, &mut w, method)?;
        }
        if class.is_root() {
            emit_root_bridges(&cx, &mut w);
        }
        emit_static_init(&cx, &mut w);
    }
    w.close();

    let mut units = vec![GeneratedUnit {
        class: class.name.clone(),
        path: names.file_path(&class.name),
        source: w.take_output(),
    }];
    if class.is_interface() {
        units.push(emit_interface_fields(&mut cx)?);
        if let Some(lambda) = emit_lambda(&mut cx) {
            units.push(lambda);
        }
    }

    tracing::debug!(class = %class.name, units = units.len(), "emitted class");
    Ok(ClassOutput {
        units,
        references: cx.into_references().into_sorted(),
    })
}

pub(crate) fn write_package(w: &mut CodeWriter, package: &str) {
    if package.is_empty() {
        w.writeln("package;");
    } else {
        w.writeln(&format!("package {package};"));
    }
    w.writeln("");
}

pub(crate) fn unit_path(dotted: &str) -> String {
    format!("{}.hx", dotted.replace('.', "/"))
}

fn declaration(cx: &mut EmitCx<'_>, class: &Class, simple_name: &str) -> String {
    let names = cx.names();
    let mut header = if class.is_interface() {
        format!("interface {simple_name}")
    } else {
        format!("class {simple_name}")
    };
    if !class.is_root() {
        if let Some(parent) = &class.extending {
            cx.reference_class(parent);
            header.push_str(&format!(" extends {}", names.class_name(parent)));
        }
    }
    let keyword = if class.is_interface() { "extends" } else { "implements" };
    for interface in &class.implementing {
        cx.reference_class(interface);
        header.push_str(&format!(" {keyword} {}", names.class_name(interface)));
    }
    header
}

/// Callable slot that function-typed casts extract.
const EXECUTE_FIELD: &str = "_execute";

/// Generated name of the `execute` method to expose as `_execute`, for the
/// topmost class of a hierarchy implementing the function marker.
fn function_entry(cx: &EmitCx<'_>) -> Result<Option<String>> {
    let program = cx.program();
    let class = cx.class;
    let inherited = class
        .extending
        .as_ref()
        .is_some_and(|parent| program.is_implementing(parent, known::FUNCTION_MARKER));
    if inherited || !program.is_implementing(&class.name, known::FUNCTION_MARKER) {
        return Ok(None);
    }
    let execute = class
        .methods
        .iter()
        .find(|method| method.name == "execute" && !method.is_static())
        .ok_or_else(|| cx.lookup_failed("method", format!("{}::execute", class.name)))?;
    Ok(Some(cx.names().method_name(&execute.reference(&class.name))))
}

fn emit_constructor(cx: &EmitCx<'_>, w: &mut CodeWriter, execute: Option<&str>) {
    w.open("public function new()");
    if !cx.class.is_root() && cx.class.extending.is_some() {
        w.writeln("super();");
    }
    if let Some(execute) = execute {
        w.writeln(&format!("{EXECUTE_FIELD} = {execute};"));
    }
    cx.session.hooks.class_enter(w);
    w.close();
}

fn emit_native_members(cx: &EmitCx<'_>, w: &mut CodeWriter) {
    for member in cx.mappings().native_members(&cx.class.name) {
        w.write_lines(member);
    }
    if let Some(annotation) = cx.class.annotation(annotations::ADD_MEMBERS) {
        for member in annotation.string_values("value") {
            w.write_lines(member);
        }
    }
}

fn emit_field(cx: &mut EmitCx<'_>, w: &mut CodeWriter, field: &Field) {
    let reference = field.reference(&cx.class.name);
    if !cx.mappings().is_field_available(&reference)
        || field.annotation(annotations::REMOVE_FIELD).is_some()
    {
        return;
    }
    let names = cx.names();
    cx.reference(&field.ty);
    let keep = if field.annotation(annotations::KEEP).is_some() {
        "@:keep "
    } else {
        ""
    };
    let storage = if field.is_static() { "static " } else { "" };
    let value = field
        .constant
        .clone()
        .unwrap_or_else(|| names.default_value(&field.ty));
    w.writeln(&format!(
        "{keep}{storage}public var {}:{} = {};",
        names.field_name(&reference),
        names.type_tag(&field.ty),
        escape_literal(&value)
    ));
}

/// `name(p0:T, ...):R`, recording parameter and return types.
fn signature(cx: &mut EmitCx<'_>, class: &Class, method: &Method) -> String {
    let names = cx.names();
    let mut params = Vec::with_capacity(method.params.len());
    for param in &method.params {
        cx.reference(&param.ty);
        params.push(format!(
            "{}:{}",
            names.local_name(&param.name),
            names.type_tag(&param.ty)
        ));
    }
    cx.reference(&method.ret);
    format!(
        "{}({}):{}",
        names.method_name(&method.reference(&class.name)),
        params.join(", "),
        names.type_tag(&method.ret)
    )
}

/// Target source replacing the method body, if the method has one.
fn native_body(cx: &EmitCx<'_>, method: &Method) -> Option<String> {
    let reference = method.reference(&cx.class.name);
    if let Some(body) = cx.mappings().native_body(&reference) {
        return Some(body.to_string());
    }
    let annotation = method.annotation(annotations::METHOD_BODY)?;
    let values = annotation.string_values("value");
    (!values.is_empty()).then(|| values.join("\n"))
}

fn emit_method(cx: &mut EmitCx<'_>, w: &mut CodeWriter, method: &Method) -> Result<()> {
    let class = cx.class;
    let storage = if method.is_static() { "static " } else { "" };
    let inline = if method.is_inline { "inline " } else { "" };
    let overrides = if method.is_override && !method.is_static() {
        "override "
    } else {
        ""
    };
    let signature = signature(cx, class, method);
    w.open(&format!("{storage}public {inline}{overrides}function {signature}"));

    match (native_body(cx, method), &method.body) {
        (Some(native), _) => w.write_lines(&native),
        (None, Some(body)) => emit_body(cx, w, method, body)?,
        (None, None) => {
            w.writeln("HaxeNatives.debugger();");
            let message = format!(
                "Native or abstract: {}.{} :: {}",
                class.name,
                method.name,
                method.descriptor()
            );
            w.writeln(&format!("throw {};", quote(&message)));
        }
    }
    w.close();
    Ok(())
}

/// Target-side `toString` and `hashCode` forwarding to the translated ones.
fn emit_root_bridges(cx: &EmitCx<'_>, w: &mut CodeWriter) {
    let names = cx.names();
    let method_name = |name: &str| {
        cx.class
            .methods
            .iter()
            .find(|method| method.name == name && method.params.is_empty())
            .map(|method| names.method_name(&method.reference(&cx.class.name)))
    };
    if let Some(to_string) = method_name("toString") {
        w.open("public function toString():String");
        w.writeln(&format!(
            "return HaxeNatives.toNativeString(this.{to_string}());"
        ));
        w.close();
    }
    if let Some(hash_code) = method_name("hashCode") {
        w.open("public function hashCode():Int");
        w.writeln(&format!("return this.{hash_code}();"));
        w.close();
    }
}

fn emit_static_init(cx: &EmitCx<'_>, w: &mut CodeWriter) {
    let clinit = cx
        .class
        .static_init()
        .map(|method| cx.names().method_name(&method.reference(&cx.class.name)));
    cx.session.hooks.static_init(w, clinit.as_deref());
}

/// `X__IFields`: statics of an interface.
fn emit_interface_fields(cx: &mut EmitCx<'_>) -> Result<GeneratedUnit> {
    let class = cx.class;
    let holder = FqName::new(cx.names().static_owner(&class.name));

    let mut w = CodeWriter::new();
    write_package(&mut w, holder.package());
    w.open(&format!("class {}", holder.simple_name()));
    w.writeln("public function new() {}");
    for field in class.fields.iter().filter(|field| field.is_static()) {
        emit_field(cx, &mut w, field);
    }
    for method in class.methods.iter().filter(|method| method.is_static()) {
        emit_method(cx, &mut w, method)?;
    }
    emit_static_init(cx, &mut w);
    w.close();

    Ok(GeneratedUnit {
        class: class.name.clone(),
        path: unit_path(holder.as_str()),
        source: w.take_output(),
    })
}

/// `X__Lambda`: wraps a target closure as an implementation of a
/// single-method interface.
fn emit_lambda(cx: &mut EmitCx<'_>) -> Option<GeneratedUnit> {
    let class = cx.class;
    let Some(method) = class.functional_method() else {
        tracing::trace!(class = %class.name, "not a functional interface, no lambda adapter");
        return None;
    };

    let names = cx.names();
    let lambda = FqName::new(names.lambda_name(&class.name));
    let function_type = names.functional_type(&method.method_type());
    let object = FqName::new(known::OBJECT);
    cx.reference_class(&object);

    let mut w = CodeWriter::new();
    write_package(&mut w, lambda.package());
    w.open(&format!(
        "class {} extends {} implements {}",
        lambda.simple_name(),
        names.class_name(&object),
        names.class_name(&class.name)
    ));
    w.writeln(&format!("private var ___func__:{function_type};"));
    w.writeln(&format!(
        "public function new(func:{function_type}) {{ super(); this.___func__ = func; }}"
    ));
    let signature = signature(cx, class, method);
    let args = method
        .params
        .iter()
        .map(|param| names.local_name(&param.name))
        .collect::<Vec<_>>()
        .join(", ");
    let call = format!("___func__({args})");
    if method.method_type().is_void() {
        w.writeln(&format!("public function {signature} {{ {call}; }}"));
    } else {
        w.writeln(&format!("public function {signature} {{ return {call}; }}"));
    }
    w.close();

    Some(GeneratedUnit {
        class: class.name.clone(),
        path: unit_path(lambda.as_str()),
        source: w.take_output(),
    })
}
