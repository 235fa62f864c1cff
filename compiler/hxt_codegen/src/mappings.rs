//! Builder-populated mapping tables.

use rustc_hash::{FxHashMap, FxHashSet};

use hxt_ir::{FieldRef, FqName, MethodRef, Type};

use crate::services::{Accessor, Mappings};

/// In-memory [`Mappings`] implementation.
///
/// Drivers fill it from whatever mapping source they read; tests build it
/// inline.
#[derive(Clone, Debug, Default)]
pub struct MappingTable {
    native_bodies: FxHashMap<MethodRef, String>,
    inline_templates: FxHashMap<MethodRef, String>,
    accessors: FxHashMap<MethodRef, Accessor>,
    adaptors: FxHashMap<(Type, Type), String>,
    hidden_fields: FxHashSet<FieldRef>,
    native_members: FxHashMap<FqName, Vec<String>>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_native_body(mut self, method: MethodRef, body: impl Into<String>) -> Self {
        self.native_bodies.insert(method, body.into());
        self
    }

    #[must_use]
    pub fn with_inline_template(mut self, method: MethodRef, template: impl Into<String>) -> Self {
        self.inline_templates.insert(method, template.into());
        self
    }

    #[must_use]
    pub fn with_getter(mut self, method: MethodRef, member: impl Into<String>) -> Self {
        self.accessors.insert(method, Accessor::Getter(member.into()));
        self
    }

    #[must_use]
    pub fn with_setter(mut self, method: MethodRef, member: impl Into<String>) -> Self {
        self.accessors.insert(method, Accessor::Setter(member.into()));
        self
    }

    /// Registers `adaptor` as the class wrapping `from` values where a `to`
    /// is expected.
    #[must_use]
    pub fn with_class_adaptor(mut self, from: Type, to: Type, adaptor: impl Into<String>) -> Self {
        self.adaptors.insert((from, to), adaptor.into());
        self
    }

    #[must_use]
    pub fn with_hidden_field(mut self, field: FieldRef) -> Self {
        self.hidden_fields.insert(field);
        self
    }

    #[must_use]
    pub fn with_native_member(mut self, class: impl Into<FqName>, member: impl Into<String>) -> Self {
        self.native_members
            .entry(class.into())
            .or_default()
            .push(member.into());
        self
    }
}

impl Mappings for MappingTable {
    fn native_body(&self, method: &MethodRef) -> Option<&str> {
        self.native_bodies.get(method).map(String::as_str)
    }

    fn inline_template(&self, method: &MethodRef) -> Option<&str> {
        self.inline_templates.get(method).map(String::as_str)
    }

    fn accessor(&self, method: &MethodRef) -> Option<&Accessor> {
        self.accessors.get(method)
    }

    fn class_adaptor(&self, from: &Type, to: &Type) -> Option<&str> {
        self.adaptors
            .get(&(from.clone(), to.clone()))
            .map(String::as_str)
    }

    fn is_field_available(&self, field: &FieldRef) -> bool {
        !self.hidden_fields.contains(field)
    }

    fn native_members(&self, class: &FqName) -> &[String] {
        self.native_members
            .get(class)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
