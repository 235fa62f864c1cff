//! Reflection metadata.
//!
//! Runs once, after every class has been emitted, and yields a single unit
//! holding:
//!
//! - one registration function per class, filling the runtime `Class`
//!   object with its supertype, interfaces, modifiers, annotations and one
//!   record per field, constructor and method;
//! - `__initClass`, mapping a runtime class name to its registration
//!   function, and `internalClassNameToName`, mapping a generated name back
//!   to the source name. Both dispatch on string length first, then on
//!   exact match;
//! - one proxy class per annotation type, backed by a positional value
//!   array whose slots follow the element declaration order.

use std::collections::BTreeMap;

use hxt_ir::known::{self, annotations};
use hxt_ir::{
    Annotation, AnnotationValue, Class, FqName, MethodRef, MethodType, PrimType, Program, Type,
};

use crate::context::{CodeWriter, Session};
use crate::error::{CodegenError, Result};
use crate::haxe::class::{unit_path, write_package};
use crate::haxe::literal::{escape_literal, quote, quote_opt};
use crate::init::STATIC_INIT_FN;
use crate::pipeline::GeneratedUnit;
use crate::services::NameResolver;

/// Renders annotation instances and collects the classes whose statics
/// they read.
struct AnnotationWriter<'a> {
    program: &'a Program,
    names: &'a dyn NameResolver,
    site: String,
    /// Owners of field-valued elements, first appearance first.
    field_owners: Vec<FqName>,
}

impl<'a> AnnotationWriter<'a> {
    fn new(program: &'a Program, names: &'a dyn NameResolver, site: &FqName) -> Self {
        AnnotationWriter {
            program,
            names,
            site: site.to_string(),
            field_owners: Vec::new(),
        }
    }

    /// `[new Proxy([...]), ...]`, skipping backend directives.
    fn list(&mut self, list: &[Annotation]) -> Result<String> {
        let mut items = Vec::with_capacity(list.len());
        for annotation in list {
            if !annotations::is_directive(annotation.ty.as_str()) {
                items.push(self.annotation(annotation)?);
            }
        }
        Ok(format!("[{}]", items.join(", ")))
    }

    /// Explicit element values, falling back to the element default, then
    /// to `null`.
    fn annotation(&mut self, annotation: &Annotation) -> Result<String> {
        let program = self.program;
        let elements = program
            .annotation_elements(&annotation.ty)
            .ok_or_else(|| CodegenError::lookup(self.site.clone(), "annotation type", &annotation.ty))?;
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            let value = annotation
                .element(&element.name)
                .or(element.annotation_default.as_ref());
            values.push(match value {
                Some(value) => self.value(value)?,
                None => "null".to_string(),
            });
        }
        Ok(format!(
            "new {}([{}])",
            proxy_name(self.names, &annotation.ty),
            values.join(", ")
        ))
    }

    fn value(&mut self, value: &AnnotationValue) -> Result<String> {
        Ok(match value {
            AnnotationValue::Literal(literal) => escape_literal(literal),
            AnnotationValue::Class(ty) => {
                format!("HaxeNatives.resolveClass({})", quote(&ty.runtime_class_name()))
            }
            AnnotationValue::Annotation(nested) => self.annotation(nested)?,
            AnnotationValue::List(values) => {
                let mut items = Vec::with_capacity(values.len());
                for value in values {
                    items.push(self.value(value)?);
                }
                format!("[{}]", items.join(", "))
            }
            AnnotationValue::Field(field) => {
                if !self.field_owners.contains(&field.class) {
                    self.field_owners.push(field.class.clone());
                }
                self.names.static_field_text(field)
            }
        })
    }
}

fn proxy_name(names: &dyn NameResolver, ty: &FqName) -> String {
    format!(
        "AnnotationProxy_{}",
        names.generated_name(ty).as_str().replace('.', "_")
    )
}

/// Annotation types that get a proxy class, in first-appearance order.
pub fn proxy_types(program: &Program) -> Vec<&FqName> {
    program
        .annotation_registry()
        .types
        .into_iter()
        .filter(|ty| !annotations::is_directive(ty.as_str()))
        .collect()
}

fn class_of(names: &dyn NameResolver, name: &str) -> String {
    names.class_name(&FqName::new(name))
}

/// Emits the reflection unit for the whole program.
pub fn emit_reflection(session: Session<'_>) -> Result<GeneratedUnit> {
    let program = session.program;
    let names = session.names;
    let unit = FqName::new(session.options.reflection_unit.as_str());

    let mut classes: Vec<&Class> = program.classes().iter().collect();
    classes.sort_by(|a, b| a.name.cmp(&b.name));

    let mut w = CodeWriter::new();
    write_package(&mut w, unit.package());
    w.open(&format!("class {}", unit.simple_name()));
    emit_init_class(&mut w, names, &classes);
    emit_name_dispatcher(&mut w, names, &classes);
    for (index, class) in classes.iter().enumerate() {
        emit_registration(&mut w, session, index, class)?;
    }
    emit_record_helpers(&mut w, names, session.hooks.init_on_reflect());
    w.close();

    let proxies = proxy_types(program);
    for ty in &proxies {
        emit_proxy(&mut w, program, names, &unit, ty)?;
    }

    tracing::debug!(
        classes = classes.len(),
        proxies = proxies.len(),
        "emitted reflection metadata"
    );
    Ok(GeneratedUnit {
        class: unit.clone(),
        path: unit_path(unit.as_str()),
        source: w.take_output(),
    })
}

/// Groups `(key, line)` pairs into `case <len>:` arms of a length switch.
fn write_length_switch(w: &mut CodeWriter, arms: Vec<(String, String)>) {
    let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (key, line) in arms {
        groups.entry(key.len()).or_default().push(line);
    }
    w.open("switch (cn.length)");
    for (length, lines) in groups {
        w.writeln(&format!("case {length}:"));
        w.indent();
        for line in lines {
            w.writeln(&line);
        }
        w.dedent();
    }
    w.close();
}

fn emit_init_class(w: &mut CodeWriter, names: &dyn NameResolver, classes: &[&Class]) {
    let class_tag = class_of(names, known::CLASS);
    w.open(&format!("static public function __initClass(c:{class_tag}):Bool"));
    w.writeln("var cn = c.name._str;");
    w.writeln("if (cn.substr(0, 1) == '[') return true;");
    let primitives = std::iter::once('V')
        .chain(PrimType::ALL.iter().map(|prim| prim.descriptor()))
        .map(|descriptor| format!("cn == '{descriptor}'"))
        .collect::<Vec<_>>()
        .join(" || ");
    w.writeln(&format!("if ({primitives}) return true;"));
    let arms = classes
        .iter()
        .enumerate()
        .map(|(index, class)| {
            let name = class.name.to_string();
            let line = format!("if (cn == {}) return c{index}(c);", quote(&name));
            (name, line)
        })
        .collect();
    write_length_switch(w, arms);
    w.writeln("return false;");
    w.close();
}

fn emit_name_dispatcher(w: &mut CodeWriter, names: &dyn NameResolver, classes: &[&Class]) {
    w.open("static public function internalClassNameToName(internalClassName:String):String");
    w.writeln("var cn = internalClassName;");
    let arms = classes
        .iter()
        .map(|class| {
            let generated = names.generated_name(&class.name).to_string();
            let line = format!(
                "if (cn == {}) return {};",
                quote(&generated),
                quote(class.name.as_str())
            );
            (generated, line)
        })
        .collect();
    write_length_switch(w, arms);
    w.writeln("throw 'Unknown class $internalClassName';");
    w.close();
}

fn emit_registration(
    w: &mut CodeWriter,
    session: Session<'_>,
    index: usize,
    class: &Class,
) -> Result<()> {
    let names = session.names;
    let mut writer = AnnotationWriter::new(session.program, names, &class.name);

    let class_annotations = writer.list(&class.annotations)?;
    let parent = class
        .extending
        .as_ref()
        .map_or_else(|| "null".to_string(), |parent| quote(parent.as_str()));
    let interfaces = class
        .implementing
        .iter()
        .map(|interface| quote(interface.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let mut records = vec![format!(
        "info(c, {}, {parent}, [{interfaces}], {}, {class_annotations});",
        names.class_name(&class.name),
        class.modifiers.bits()
    )];

    for (slot, field) in class.fields.iter().enumerate() {
        let internal = names.field_name(&field.reference(&class.name));
        records.push(format!(
            "field(c, {}, {slot}, {}, {}, {}, {}, {});",
            quote(&internal),
            quote(&field.name),
            quote(&field.ty.descriptor()),
            field.modifiers.bits(),
            quote_opt(field.generic_signature.as_deref()),
            writer.list(&field.annotations)?
        ));
    }

    for (slot, method) in class.methods.iter().enumerate() {
        if method.is_static_init() {
            continue;
        }
        let internal = quote(&names.method_name(&method.reference(&class.name)));
        let modifiers = method.modifiers.bits();
        let descriptor = quote(&method.descriptor());
        let generic = quote_opt(method.generic_signature.as_deref());
        let method_annotations = writer.list(&method.annotations)?;
        records.push(if method.is_constructor() {
            format!(
                "constructor(c, {internal}, {slot}, {modifiers}, {descriptor}, {generic}, {method_annotations});"
            )
        } else {
            format!(
                "method(c, {internal}, {slot}, {}, {modifiers}, {descriptor}, {generic}, {method_annotations});",
                quote(&method.name)
            )
        });
    }

    w.open(&format!(
        "static private function c{index}(c:{}):Bool",
        class_of(names, known::CLASS)
    ));
    session.hooks.static_touch(w, names, &writer.field_owners);
    for record in &records {
        w.writeln(record);
    }
    w.writeln("return true;");
    w.close();
    Ok(())
}

/// `getJavaClass` and the `info`/`field`/`method`/`constructor` record
/// builders the registration functions call.
fn emit_record_helpers(w: &mut CodeWriter, names: &dyn NameResolver, init_on_reflect: bool) {
    let class_tag = class_of(names, known::CLASS);
    let for_name = names.method_name(&MethodRef::new(
        known::CLASS,
        "forName",
        MethodType::new(vec![Type::string()], Type::reference(known::CLASS)),
    ));

    w.open("static public function getJavaClass(str:String)");
    w.writeln(&format!("return {class_tag}.{for_name}(HaxeNatives.str(str));"));
    w.close();

    w.open(&format!(
        "static private function info(c:{class_tag}, haxeClass:Class<Dynamic>, parent:String, interfaces:Array<String>, modifiers:Int, annotations:Array<Dynamic>)"
    ));
    w.write_lines(
        "c._hxClass = haxeClass;\n\
         c._internalName = Type.getClassName(haxeClass);\n\
         c._parent = parent;\n\
         c._interfaces = interfaces;\n\
         c._modifiers = modifiers;\n\
         c._fields = [];\n\
         c._methods = [];\n\
         c._constructors = [];\n\
         c._annotations = annotations;",
    );
    if init_on_reflect {
        w.writeln(&format!(
            "var initMethod = Reflect.field(haxeClass, '{STATIC_INIT_FN}'); if (initMethod != null) Reflect.callMethod(haxeClass, initMethod, []);"
        ));
    }
    w.close();

    w.open(&format!(
        "static private function field(c:{class_tag}, internalName:String, slot:Int, name:String, type:String, modifiers:Int, genericDescriptor:String, annotations:Array<Dynamic>)"
    ));
    w.writeln(&format!("var out = new {}();", class_of(names, known::REFLECT_FIELD)));
    w.write_lines(
        "out.clazz = c;\n\
         out.name = HaxeNatives.str(name);\n\
         out._internalName = internalName;\n\
         out.modifiers = modifiers;\n\
         out.signature = HaxeNatives.str(type);\n\
         out.genericSignature = HaxeNatives.str(genericDescriptor);\n\
         out.slot = slot;\n\
         out._annotations = annotations;\n\
         c._fields.push(out);",
    );
    w.close();

    w.open(&format!(
        "static private function method(c:{class_tag}, internalName:String, slot:Int, name:String, modifiers:Int, signature:String, genericDescriptor:String, annotations:Array<Dynamic>)"
    ));
    w.writeln(&format!("var out = new {}();", class_of(names, known::REFLECT_METHOD)));
    w.write_lines(
        "out._internalName = internalName;\n\
         out.clazz = c;\n\
         out.name = HaxeNatives.str(name);\n\
         out.signature = HaxeNatives.str(signature);\n\
         out.genericSignature = HaxeNatives.str(genericDescriptor);\n\
         out.slot = slot;\n\
         out.modifiers = modifiers;\n\
         out._annotations = annotations;\n\
         c._methods.push(out);",
    );
    w.close();

    w.open(&format!(
        "static private function constructor(c:{class_tag}, internalName:String, slot:Int, modifiers:Int, signature:String, genericDescriptor:String, annotations:Array<Dynamic>)"
    ));
    w.writeln(&format!(
        "var out = new {}();",
        class_of(names, known::REFLECT_CONSTRUCTOR)
    ));
    w.write_lines(
        "out._internalName = internalName;\n\
         out.clazz = c;\n\
         out.slot = slot;\n\
         out.modifiers = modifiers;\n\
         out.signature = HaxeNatives.str(signature);\n\
         out.genericSignature = HaxeNatives.str(genericDescriptor);\n\
         out._annotations = annotations;\n\
         c._constructors.push(out);",
    );
    w.close();
}

fn emit_proxy(
    w: &mut CodeWriter,
    program: &Program,
    names: &dyn NameResolver,
    unit: &FqName,
    ty: &FqName,
) -> Result<()> {
    let elements = program
        .annotation_elements(ty)
        .ok_or_else(|| CodegenError::lookup(unit.to_string(), "annotation type", ty))?;
    let class_tag = class_of(names, known::CLASS);
    let class_getter = |name: &str| {
        names.method_name(&MethodRef::new(
            ty.clone(),
            name,
            MethodType::new(vec![], Type::reference(known::CLASS)),
        ))
    };
    let resolve = format!("HaxeNatives.resolveClass({})", quote(ty.as_str()));

    w.writeln(&format!("// annotation type: {ty}"));
    w.open(&format!(
        "class {} extends {} implements {}",
        proxy_name(names, ty),
        class_of(names, known::ANNOTATION_BASE),
        names.class_name(ty)
    ));
    w.writeln("private var _data:Array<Dynamic>;");
    w.writeln("public function new(_data:Dynamic = null) { super(); this._data = _data; }");
    w.writeln(&format!(
        "public function {}():{class_tag} {{ return {resolve}; }}",
        class_getter("annotationType")
    ));
    w.writeln(&format!(
        "override public function {}():{class_tag} {{ return {resolve}; }}",
        class_getter("getClass")
    ));
    for (slot, element) in elements.iter().enumerate() {
        w.writeln(&format!(
            "public function {}():{} {{ return this._data[{slot}]; }}",
            names.method_name(&element.reference(ty)),
            names.type_tag(&element.ret)
        ));
    }
    w.close();
    Ok(())
}
