//! Entrypoint synthesis.

use hxt_ir::known::annotations;
use hxt_ir::{FqName, MethodRef, MethodType, Type};

use crate::context::Session;
use crate::error::{CodegenError, Result};
use crate::pipeline::GeneratedUnit;
use crate::template::substitute;

/// Default entrypoint body; `$`-placeholders are filled by [`emit_entry`].
const PLAIN_MAIN: &str = "package $entryPointPackage;
class $entryPointSimpleName {
\tstatic public function main() {
\t\t$inits
\t\t$mainClass.$mainMethod(HaxeNatives.strArray(HaxeNatives.args()));
\t}
}
";

/// Emits the `<entry><suffix>` unit. `order` is the static init order,
/// empty unless the strategy asked for one.
pub fn emit_entry(session: Session<'_>, order: &[FqName]) -> Result<GeneratedUnit> {
    let program = session.program;
    let names = session.names;
    let entry = program.entrypoint();

    let main = MethodRef::new(
        entry.clone(),
        "main",
        MethodType::new(vec![Type::array(Type::string())], Type::Void),
    );
    let (owner, _) = program.method_ref(&main).ok_or_else(|| {
        CodegenError::lookup(
            entry.to_string(),
            "method",
            format!("{}{}", main.name, main.descriptor()),
        )
    })?;

    let entry_class = entry.with_suffix(&session.options.entry_suffix);
    let generated = names.generated_name(&entry_class);

    let mut inits = vec!["haxe.CallStack.callStack();".to_string()];
    inits.extend(session.hooks.bootstrap(names, order));
    let inits = inits.join("\n\t\t");

    let custom = program
        .find_annotations(annotations::CUSTOM_MAIN)
        .map(|annotation| annotation.string_values("value").join("\n"))
        .find(|text| !text.is_empty());
    if custom.is_some() {
        tracing::debug!(entry = %entry, "using custom entrypoint template");
    }
    let template = custom.as_deref().unwrap_or(PLAIN_MAIN);

    let main_class = names.class_name(&owner.name);
    let main_method = names.method_name(&main);
    let source = substitute(
        template,
        '$',
        &[
            ("entryPointPackage", generated.package()),
            ("entryPointSimpleName", generated.simple_name()),
            ("mainClass", &main_class),
            ("mainMethod", &main_method),
            ("inits", &inits),
        ],
    );

    Ok(GeneratedUnit {
        class: entry_class.clone(),
        path: names.file_path(&entry_class),
        source,
    })
}
