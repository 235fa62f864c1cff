//! Well-known class, member and annotation names.

/// Root of the class hierarchy.
pub const OBJECT: &str = "java.lang.Object";
pub const CLASS: &str = "java.lang.Class";
pub const STRING: &str = "java.lang.String";
pub const THROWABLE: &str = "java.lang.Throwable";

pub const BOOLEAN: &str = "java.lang.Boolean";
pub const BYTE: &str = "java.lang.Byte";
pub const SHORT: &str = "java.lang.Short";
pub const CHARACTER: &str = "java.lang.Character";
pub const INTEGER: &str = "java.lang.Integer";
pub const LONG: &str = "java.lang.Long";
pub const FLOAT: &str = "java.lang.Float";
pub const DOUBLE: &str = "java.lang.Double";

/// Runtime base class of generated annotation proxies.
pub const ANNOTATION_BASE: &str = "jtransc.internal.JTranscAnnotationBase";

pub const REFLECT_FIELD: &str = "java.lang.reflect.Field";
pub const REFLECT_METHOD: &str = "java.lang.reflect.Method";
pub const REFLECT_CONSTRUCTOR: &str = "java.lang.reflect.Constructor";

/// Marker interface for values that are callable on the target.
pub const FUNCTION_MARKER: &str = "all.core.AllFunction";

/// Method name of constructors.
pub const CONSTRUCTOR: &str = "<init>";
/// Method name of static initializers.
pub const STATIC_INIT: &str = "<clinit>";

/// Annotations understood by the backend.
pub mod annotations {
    /// Keep a member alive through target-side dead-code elimination.
    pub const KEEP: &str = "jtransc.annotation.JTranscKeep";
    /// Replace a method body with target source (`value`).
    pub const METHOD_BODY: &str = "jtransc.annotation.haxe.HaxeMethodBody";
    /// Inject raw target members into a class (`value`: list of strings).
    pub const ADD_MEMBERS: &str = "jtransc.annotation.haxe.HaxeAddMembers";
    /// Drop a field from the generated class.
    pub const REMOVE_FIELD: &str = "jtransc.annotation.haxe.HaxeRemoveField";
    /// Replace the generated entrypoint body (`value`).
    pub const CUSTOM_MAIN: &str = "jtransc.annotation.haxe.HaxeCustomMain";
    /// Resource files copied next to the generated sources (`value`).
    pub const ADD_FILES: &str = "jtransc.annotation.haxe.HaxeAddFiles";

    const DIRECTIVE_PACKAGE: &str = "jtransc.annotation.";

    /// Backend directives steer generation only and are invisible to
    /// reflection.
    pub fn is_directive(ty: &str) -> bool {
        ty.starts_with(DIRECTIVE_PACKAGE)
    }
}
