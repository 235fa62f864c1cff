//! Classes, members, annotations and the program that owns them.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::{FieldRef, Local, MethodRef, Param, Stmt};
use crate::known;
use crate::literal::Literal;
use crate::modifiers::Modifiers;
use crate::name::FqName;
use crate::types::{MethodType, Type};

/// Kind of a class declaration.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Abstract,
}

/// Where the implementation of a class comes from.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassOrigin {
    /// Translated from its members.
    #[default]
    Generated,
    /// Provided by the target runtime. No unit is emitted; `native_name`
    /// replaces the generated name at every use site.
    Native { native_name: Option<String> },
    /// Opaque implementation passed through verbatim.
    External { source: String },
}

/// An annotation element value.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum AnnotationValue {
    Literal(Literal),
    Class(Type),
    Annotation(Annotation),
    List(Vec<AnnotationValue>),
    /// A static field, typically an enum constant.
    Field(FieldRef),
}

impl AnnotationValue {
    /// Visit this value and every value nested inside it.
    fn for_each<'a>(&'a self, f: &mut impl FnMut(&'a AnnotationValue)) {
        f(self);
        match self {
            AnnotationValue::List(values) => {
                for value in values {
                    value.for_each(f);
                }
            }
            AnnotationValue::Annotation(annotation) => {
                for (_, value) in &annotation.elements {
                    value.for_each(f);
                }
            }
            AnnotationValue::Literal(_) | AnnotationValue::Class(_) | AnnotationValue::Field(_) => {
            }
        }
    }
}

/// An annotation instance: its type plus explicitly given elements.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    pub ty: FqName,
    pub elements: Vec<(String, AnnotationValue)>,
}

impl Annotation {
    pub fn new(ty: impl Into<FqName>) -> Self {
        Annotation {
            ty: ty.into(),
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_element(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.elements.push((name.into(), value));
        self
    }

    pub fn element(&self, name: &str) -> Option<&AnnotationValue> {
        self.elements
            .iter()
            .find(|(element, _)| element == name)
            .map(|(_, value)| value)
    }

    /// String payload of `value`, flattening a list of strings.
    pub fn string_values(&self, name: &str) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(value) = self.element(name) {
            value.for_each(&mut |value| {
                if let AnnotationValue::Literal(Literal::String(text)) = value {
                    out.push(text.as_str());
                }
            });
        }
        out
    }
}

/// Finds the annotation of type `ty` in a member's annotation list.
pub(crate) fn find_annotation<'a>(annotations: &'a [Annotation], ty: &str) -> Option<&'a Annotation> {
    annotations.iter().find(|annotation| annotation.ty.as_str() == ty)
}

/// Locals and root statement of a method.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub locals: Vec<Local>,
    pub stmt: Stmt,
}

impl Body {
    pub fn new(locals: Vec<Local>, stmt: Stmt) -> Self {
        Body { locals, stmt }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub modifiers: Modifiers,
    pub constant: Option<Literal>,
    pub annotations: Vec<Annotation>,
    pub generic_signature: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type, modifiers: Modifiers) -> Self {
        Field {
            name: name.into(),
            ty,
            modifiers,
            constant: None,
            annotations: Vec::new(),
            generic_signature: None,
        }
    }

    #[must_use]
    pub fn with_constant(mut self, constant: Literal) -> Self {
        self.constant = Some(constant);
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    pub fn annotation(&self, ty: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, ty)
    }

    pub fn reference(&self, class: &FqName) -> FieldRef {
        FieldRef::new(class.clone(), self.name.clone(), self.ty.clone())
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Type,
    pub modifiers: Modifiers,
    /// `None` for native and abstract methods.
    pub body: Option<Body>,
    pub is_override: bool,
    pub is_inline: bool,
    pub annotations: Vec<Annotation>,
    pub generic_signature: Option<String>,
    /// Default value of an annotation element.
    pub annotation_default: Option<AnnotationValue>,
}

impl Method {
    pub fn new(name: impl Into<String>, params: Vec<Param>, ret: Type, modifiers: Modifiers) -> Self {
        Method {
            name: name.into(),
            params,
            ret,
            modifiers,
            body: None,
            is_override: false,
            is_inline: false,
            annotations: Vec::new(),
            generic_signature: None,
            annotation_default: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_override(mut self, is_override: bool) -> Self {
        self.is_override = is_override;
        self
    }

    #[must_use]
    pub fn with_inline(mut self, is_inline: bool) -> Self {
        self.is_inline = is_inline;
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn with_annotation_default(mut self, value: AnnotationValue) -> Self {
        self.annotation_default = Some(value);
        self
    }

    pub fn method_type(&self) -> MethodType {
        MethodType::new(
            self.params.iter().map(|param| param.ty.clone()).collect(),
            self.ret.clone(),
        )
    }

    pub fn descriptor(&self) -> String {
        self.method_type().descriptor()
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT)
    }

    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.name == known::CONSTRUCTOR
    }

    #[inline]
    pub fn is_static_init(&self) -> bool {
        self.name == known::STATIC_INIT
    }

    pub fn annotation(&self, ty: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, ty)
    }

    pub fn reference(&self, class: &FqName) -> MethodRef {
        MethodRef::new(class.clone(), self.name.clone(), self.method_type())
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Class {
    pub name: FqName,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub extending: Option<FqName>,
    pub implementing: Vec<FqName>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub annotations: Vec<Annotation>,
    pub origin: ClassOrigin,
}

impl Class {
    /// A public class extending `java.lang.Object` (nothing for the root).
    pub fn new(name: impl Into<FqName>, kind: ClassKind) -> Self {
        let name = name.into();
        let extending = match kind {
            ClassKind::Interface => None,
            _ if name.as_str() == known::OBJECT => None,
            _ => Some(FqName::new(known::OBJECT)),
        };
        let mut modifiers = Modifiers::PUBLIC;
        match kind {
            ClassKind::Interface => modifiers |= Modifiers::INTERFACE | Modifiers::ABSTRACT,
            ClassKind::Abstract => modifiers |= Modifiers::ABSTRACT,
            ClassKind::Class => {}
        }
        Class {
            name,
            kind,
            modifiers,
            extending,
            implementing: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            origin: ClassOrigin::Generated,
        }
    }

    #[must_use]
    pub fn with_super(mut self, extending: impl Into<FqName>) -> Self {
        self.extending = Some(extending.into());
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<FqName>) -> Self {
        self.implementing.push(interface.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: ClassOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.kind == ClassKind::Abstract
    }

    #[inline]
    pub fn is_native(&self) -> bool {
        matches!(self.origin, ClassOrigin::Native { .. })
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.name.as_str() == known::OBJECT
    }

    pub fn static_init(&self) -> Option<&Method> {
        self.methods.iter().find(|method| method.is_static_init())
    }

    /// The single abstract method of an interface without super-interfaces;
    /// only such interfaces get a closure adapter.
    pub fn functional_method(&self) -> Option<&Method> {
        if !self.is_interface() || !self.implementing.is_empty() {
            return None;
        }
        let mut methods = self.abstract_methods();
        match (methods.next(), methods.next()) {
            (Some(method), None) => Some(method),
            _ => None,
        }
    }

    /// Methods without an implementation on an interface, or flagged abstract.
    pub fn abstract_methods(&self) -> impl Iterator<Item = &Method> {
        let interface = self.is_interface();
        self.methods.iter().filter(move |method| {
            !method.is_static()
                && !method.is_static_init()
                && (method.is_abstract() || (interface && method.body.is_none()))
        })
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn method(&self, name: &str, descriptor: &str) -> Option<&Method> {
        self.methods
            .iter()
            .find(|method| method.name == name && method.descriptor() == descriptor)
    }

    pub fn annotation(&self, ty: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, ty)
    }

    /// Supertype followed by interfaces.
    pub fn parents(&self) -> impl Iterator<Item = &FqName> {
        self.extending.iter().chain(&self.implementing)
    }
}

/// Every annotation instance of a program and the distinct annotation types.
#[derive(Debug, Default)]
pub struct AnnotationRegistry<'p> {
    pub instances: Vec<&'p Annotation>,
    /// Distinct annotation types in first-appearance order.
    pub types: Vec<&'p FqName>,
}

impl<'p> AnnotationRegistry<'p> {
    fn add_all(&mut self, seen: &mut FxHashSet<&'p FqName>, annotations: &'p [Annotation]) {
        for annotation in annotations {
            self.add(seen, annotation);
        }
    }

    fn add(&mut self, seen: &mut FxHashSet<&'p FqName>, annotation: &'p Annotation) {
        self.instances.push(annotation);
        if seen.insert(&annotation.ty) {
            self.types.push(&annotation.ty);
        }
        for (_, value) in &annotation.elements {
            self.add_value(seen, value);
        }
    }

    fn add_value(&mut self, seen: &mut FxHashSet<&'p FqName>, value: &'p AnnotationValue) {
        match value {
            AnnotationValue::Annotation(nested) => self.add(seen, nested),
            AnnotationValue::List(values) => {
                for value in values {
                    self.add_value(seen, value);
                }
            }
            AnnotationValue::Literal(_) | AnnotationValue::Class(_) | AnnotationValue::Field(_) => {
            }
        }
    }
}

/// A resolved program: classes in input order and the entry class.
#[derive(Clone, Debug)]
pub struct Program {
    classes: Vec<Class>,
    index: FxHashMap<FqName, usize>,
    entrypoint: FqName,
}

impl Program {
    pub fn new(entrypoint: impl Into<FqName>) -> Self {
        Program {
            classes: Vec::new(),
            index: FxHashMap::default(),
            entrypoint: entrypoint.into(),
        }
    }

    /// Adds a class; a class with the same name replaces the earlier one
    /// in place.
    pub fn add_class(&mut self, class: Class) {
        if let Some(&idx) = self.index.get(&class.name) {
            self.classes[idx] = class;
        } else {
            self.index.insert(class.name.clone(), self.classes.len());
            self.classes.push(class);
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: Class) -> Self {
        self.add_class(class);
        self
    }

    #[inline]
    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    #[inline]
    pub fn entrypoint(&self) -> &FqName {
        &self.entrypoint
    }

    pub fn class(&self, name: &FqName) -> Option<&Class> {
        self.index.get(name).map(|&idx| &self.classes[idx])
    }

    /// Resolves a method on `class` or, failing that, on its ancestors
    /// (supertypes first, then interfaces).
    pub fn method(&self, class: &FqName, name: &str, descriptor: &str) -> Option<(&Class, &Method)> {
        let mut visited = FxHashSet::default();
        self.find_member(class, &mut visited, &|owner| owner.method(name, descriptor))
    }

    /// Resolves a field on `class` or its ancestors.
    pub fn field(&self, class: &FqName, name: &str) -> Option<(&Class, &Field)> {
        let mut visited = FxHashSet::default();
        self.find_member(class, &mut visited, &|owner| owner.field(name))
    }

    /// Whether `interface` is among the ancestors of `class`. The interface
    /// itself need not be part of the program.
    pub fn is_implementing(&self, class: &FqName, interface: &str) -> bool {
        let mut visited = FxHashSet::default();
        let mut pending = vec![class];
        while let Some(name) = pending.pop() {
            if !visited.insert(name) {
                continue;
            }
            let Some(owner) = self.class(name) else {
                continue;
            };
            for parent in owner.parents() {
                if parent.as_str() == interface {
                    return true;
                }
                pending.push(parent);
            }
        }
        false
    }

    pub fn method_ref(&self, method: &MethodRef) -> Option<(&Class, &Method)> {
        self.method(&method.class, &method.name, &method.descriptor())
    }

    fn find_member<'a, T: 'a>(
        &'a self,
        class: &FqName,
        visited: &mut FxHashSet<FqName>,
        get: &dyn Fn(&'a Class) -> Option<&'a T>,
    ) -> Option<(&'a Class, &'a T)> {
        if !visited.insert(class.clone()) {
            return None;
        }
        let owner = self.class(class)?;
        if let Some(member) = get(owner) {
            return Some((owner, member));
        }
        owner
            .parents()
            .find_map(|parent| self.find_member(parent, visited, get))
    }

    /// Every annotation reachable from classes, fields, methods, nested
    /// values and element defaults.
    pub fn annotation_registry(&self) -> AnnotationRegistry<'_> {
        let mut registry = AnnotationRegistry::default();
        let mut seen = FxHashSet::default();
        for class in &self.classes {
            registry.add_all(&mut seen, &class.annotations);
            for field in &class.fields {
                registry.add_all(&mut seen, &field.annotations);
            }
            for method in &class.methods {
                registry.add_all(&mut seen, &method.annotations);
                if let Some(default) = &method.annotation_default {
                    registry.add_value(&mut seen, default);
                }
            }
        }
        registry
    }

    /// Element accessors of an annotation type in declaration order.
    pub fn annotation_elements(&self, ty: &FqName) -> Option<Vec<&Method>> {
        let class = self.class(ty)?;
        Some(
            class
                .methods
                .iter()
                .filter(|method| !method.is_static() && !method.is_static_init())
                .collect(),
        )
    }

    /// Annotations of type `ty` on classes and methods, in input order.
    pub fn find_annotations<'a>(&'a self, ty: &'a str) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.classes.iter().flat_map(move |class| {
            find_annotation(&class.annotations, ty).into_iter().chain(
                class
                    .methods
                    .iter()
                    .filter_map(move |method| method.annotation(ty)),
            )
        })
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Tests use expect for brevity")]
mod tests;
