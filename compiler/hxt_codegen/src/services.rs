//! Injected lookup services.
//!
//! The emitters never invent identifiers or consult mapping files
//! themselves; they ask these two services. [`HaxeNames`](crate::HaxeNames)
//! and [`MappingTable`](crate::MappingTable) are the default implementations.

use hxt_ir::{FieldRef, FqName, Literal, MethodRef, MethodType, Type};

/// Maps symbolic references to collision-free target identifiers.
pub trait NameResolver: Sync {
    /// Target name used to refer to a class: generated fully-qualified
    /// name, or the native name of a runtime-provided class.
    fn class_name(&self, class: &FqName) -> String;

    /// Fully-qualified name under which a class is generated.
    fn generated_name(&self, class: &FqName) -> FqName;

    /// Output path of the unit generated for `class`.
    fn file_path(&self, class: &FqName) -> String;

    /// Class that holds the statics of `class` (interfaces keep them on a
    /// companion holder).
    fn static_owner(&self, class: &FqName) -> String;

    /// Functional adapter class of a single-method interface.
    fn lambda_name(&self, interface: &FqName) -> String;

    fn method_name(&self, method: &MethodRef) -> String;

    fn field_name(&self, field: &FieldRef) -> String;

    fn local_name(&self, name: &str) -> String;

    /// Type tag used in declarations, `new`, casts and type checks.
    fn type_tag(&self, ty: &Type) -> String;

    /// Function type of a closure with this signature.
    fn functional_type(&self, ty: &MethodType) -> String;

    /// Value a variable of this type holds before assignment.
    fn default_value(&self, ty: &Type) -> Literal;

    /// `owner.field` text of a static field.
    fn static_field_text(&self, field: &FieldRef) -> String {
        format!("{}.{}", self.static_owner(&field.class), self.field_name(field))
    }
}

/// Replacement of a method call by a member access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Accessor {
    /// Read this member instead of calling. A `$` in the text stands for
    /// the receiver.
    Getter(String),
    /// Assign the single argument to this member.
    Setter(String),
}

/// Answers per-member and per-type-pair mapping questions.
pub trait Mappings: Sync {
    /// Target source replacing the body of `method`.
    fn native_body(&self, method: &MethodRef) -> Option<&str>;

    /// Inline template replacing calls to `method`; `@obj` is the receiver
    /// and `@args` the comma-separated arguments.
    fn inline_template(&self, method: &MethodRef) -> Option<&str>;

    fn accessor(&self, method: &MethodRef) -> Option<&Accessor>;

    /// Adapter class wrapping a `from` value where a `to` is expected.
    fn class_adaptor(&self, from: &Type, to: &Type) -> Option<&str>;

    /// Whether the field exists on the target.
    fn is_field_available(&self, field: &FieldRef) -> bool;

    /// Raw members injected into the generated class.
    fn native_members(&self, class: &FqName) -> &[String];
}
