//! Default Haxe name resolver.
//!
//! Haxe reserves a handful of top-level package names and requires
//! capitalized type names, so every generated class name is suffixed with
//! `_` and clashing package segments are suffixed too:
//! `java.lang.Object` becomes `java_.lang.Object_`. Methods carry their
//! mangled descriptor so overloads never collide.

use hxt_ir::{ClassOrigin, FieldRef, FqName, Literal, MethodRef, MethodType, PrimType, Program, Type};

use crate::services::NameResolver;

/// Haxe keywords; identifiers equal to one of these get a `_` suffix.
const KEYWORDS: &[&str] = &[
    "abstract", "break", "case", "cast", "catch", "class", "continue", "default", "do",
    "dynamic", "else", "enum", "extends", "extern", "false", "final", "for", "function", "if",
    "implements", "import", "in", "inline", "interface", "macro", "new", "null", "operator",
    "overload", "override", "package", "private", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typedef", "untyped", "using", "var", "while",
];

/// Package segments that shadow Haxe standard or platform packages.
const RESERVED_PACKAGES: &[&str] = &[
    "cpp", "cs", "eval", "flash", "haxe", "hl", "internal", "java", "js", "lua", "neko", "php",
    "python", "sys",
];

/// Replaces every character that can't appear in a Haxe identifier.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn escape_keyword(name: String) -> String {
    if KEYWORDS.contains(&name.as_str()) {
        name + "_"
    } else {
        name
    }
}

fn package_segment(segment: &str) -> String {
    let segment = sanitize(segment);
    if KEYWORDS.contains(&segment.as_str()) || RESERVED_PACKAGES.contains(&segment.as_str()) {
        segment + "_"
    } else {
        segment
    }
}

/// `(args)ret` with the parentheses and separators flattened to `_`.
fn mangle_descriptor(descriptor: &str) -> String {
    descriptor
        .chars()
        .filter(|&c| c != '(')
        .map(|c| match c {
            ')' | '/' | ';' | '[' | '$' => '_',
            other => other,
        })
        .collect()
}

/// Array wrapper class for an element type.
fn array_class(element: &Type) -> &'static str {
    match element.as_prim() {
        Some(PrimType::Bool) => "HaxeBoolArray",
        Some(PrimType::Byte) => "HaxeByteArray",
        Some(PrimType::Short) => "HaxeShortArray",
        Some(PrimType::Char) => "HaxeCharArray",
        Some(PrimType::Int) => "HaxeIntArray",
        Some(PrimType::Long) => "HaxeLongArray",
        Some(PrimType::Float) => "HaxeFloatArray",
        Some(PrimType::Double) => "HaxeDoubleArray",
        None => "HaxeArray",
    }
}

/// Name resolver backed by the program model.
pub struct HaxeNames<'p> {
    program: &'p Program,
}

impl<'p> HaxeNames<'p> {
    pub fn new(program: &'p Program) -> Self {
        HaxeNames { program }
    }

    fn is_interface(&self, class: &FqName) -> bool {
        self.program.class(class).is_some_and(|class| class.is_interface())
    }
}

impl NameResolver for HaxeNames<'_> {
    fn class_name(&self, class: &FqName) -> String {
        match self.program.class(class).map(|class| &class.origin) {
            Some(ClassOrigin::Native {
                native_name: Some(native),
            }) => native.clone(),
            _ => self.generated_name(class).as_str().to_string(),
        }
    }

    fn generated_name(&self, class: &FqName) -> FqName {
        let mut out = String::new();
        let package = class.package();
        if !package.is_empty() {
            for segment in package.split('.') {
                out.push_str(&package_segment(segment));
                out.push('.');
            }
        }
        out.push_str(&sanitize(class.simple_name()));
        out.push('_');
        FqName::new(out)
    }

    fn file_path(&self, class: &FqName) -> String {
        format!("{}.hx", self.generated_name(class).internal_name())
    }

    fn static_owner(&self, class: &FqName) -> String {
        if self.is_interface(class) {
            format!("{}_IFields", self.generated_name(class))
        } else {
            self.class_name(class)
        }
    }

    fn lambda_name(&self, interface: &FqName) -> String {
        format!("{}_Lambda", self.generated_name(interface))
    }

    fn method_name(&self, method: &MethodRef) -> String {
        format!(
            "{}_{}",
            sanitize(&method.name),
            mangle_descriptor(&method.descriptor())
        )
    }

    fn field_name(&self, field: &FieldRef) -> String {
        escape_keyword(sanitize(&field.name))
    }

    fn local_name(&self, name: &str) -> String {
        escape_keyword(sanitize(name))
    }

    fn type_tag(&self, ty: &Type) -> String {
        match ty {
            Type::Void => "Void".to_string(),
            Type::Prim(PrimType::Bool) => "Bool".to_string(),
            Type::Prim(PrimType::Long) => "haxe.Int64".to_string(),
            Type::Prim(prim) if prim.is_floating() => "Float".to_string(),
            Type::Prim(_) => "Int".to_string(),
            Type::Ref(name) | Type::Generic { base: name, .. } => self.class_name(name),
            Type::Array(element) => array_class(element).to_string(),
            Type::Method(method) => self.functional_type(method),
            Type::Null => "Dynamic".to_string(),
        }
    }

    fn functional_type(&self, ty: &MethodType) -> String {
        let mut parts: Vec<String> = ty.args.iter().map(|arg| self.type_tag(arg)).collect();
        if parts.is_empty() {
            parts.push("Void".to_string());
        }
        parts.push(self.type_tag(&ty.ret));
        parts.join(" -> ")
    }

    fn default_value(&self, ty: &Type) -> Literal {
        match ty.as_prim() {
            Some(PrimType::Bool) => Literal::Bool(false),
            Some(PrimType::Long) => Literal::Long(0),
            Some(PrimType::Float) => Literal::float(0.0),
            Some(PrimType::Double) => Literal::double(0.0),
            Some(_) => Literal::Int(0),
            None => Literal::Null,
        }
    }
}
