//! The generation pass.
//!
//! Classes are emitted independently (on the rayon pool when enabled) and
//! collected in input order. The entrypoint needs the init order, and the
//! reflection unit needs every class, so both run after class emission.

use rayon::prelude::*;

use hxt_ir::known::annotations;
use hxt_ir::{Class, ClassOrigin, FqName, Program};

use crate::context::Session;
use crate::entry::emit_entry;
use crate::error::Result;
use crate::haxe::class::{emit_class, ClassOutput};
use crate::options::CodegenOptions;
use crate::order::{init_order, InitOrder};
use crate::reflection::{emit_reflection, proxy_types};
use crate::services::{Mappings, NameResolver};

/// One generated source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Source class the unit was generated for.
    pub class: FqName,
    /// Path relative to the output root.
    pub path: String,
    pub source: String,
}

/// Everything one pass produces, ready for the storage layer.
#[derive(Debug)]
pub struct GeneratedProgram {
    /// Class units in input order, then the entrypoint, then reflection.
    pub units: Vec<GeneratedUnit>,
    pub entry_point: FqName,
    pub entry_point_path: String,
    /// Resource paths requested through `HaxeAddFiles`, to be copied next
    /// to the generated sources.
    pub resources: Vec<String>,
    /// Classes each emitted class mentions, in input order.
    pub references: Vec<(FqName, Vec<FqName>)>,
    /// Empty unless the init strategy needs an order.
    pub init_order: InitOrder,
}

impl GeneratedProgram {
    pub fn unit(&self, path: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|unit| unit.path == path)
    }
}

/// Units of one class; `None` for runtime-provided classes.
fn emit_one(session: Session<'_>, class: &Class) -> Result<Option<ClassOutput>> {
    match &class.origin {
        ClassOrigin::Native { .. } => {
            tracing::trace!(class = %class.name, "runtime-provided, nothing to emit");
            Ok(None)
        }
        ClassOrigin::External { source } => Ok(Some(ClassOutput {
            units: vec![GeneratedUnit {
                class: class.name.clone(),
                path: session.names.file_path(&class.name),
                source: source.clone(),
            }],
            references: Vec::new(),
        })),
        ClassOrigin::Generated => emit_class(session, class).map(Some),
    }
}

fn resources(program: &Program) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for class in program.classes() {
        if let Some(annotation) = class.annotation(annotations::ADD_FILES) {
            for file in annotation.string_values("value") {
                if !out.iter().any(|seen| seen == file) {
                    out.push(file.to_string());
                }
            }
        }
    }
    out
}

/// Runs a full generation pass over `program`.
///
/// # Errors
///
/// The first [`CodegenError`](crate::CodegenError) raised by any emitter;
/// no partial output is returned.
pub fn generate(
    program: &Program,
    names: &dyn NameResolver,
    mappings: &dyn Mappings,
    options: &CodegenOptions,
) -> Result<GeneratedProgram> {
    let session = Session::new(program, names, mappings, options);
    tracing::debug!(
        classes = program.classes().len(),
        init_mode = %options.init_mode,
        parallel = options.parallel,
        "generating program"
    );

    let outputs: Vec<Option<ClassOutput>> = if options.parallel {
        program
            .classes()
            .par_iter()
            .map(|class| emit_one(session, class))
            .collect::<Result<_>>()?
    } else {
        program
            .classes()
            .iter()
            .map(|class| emit_one(session, class))
            .collect::<Result<_>>()?
    };

    let mut units = Vec::new();
    let mut references = Vec::new();
    for (class, output) in program.classes().iter().zip(outputs) {
        if let Some(output) = output {
            units.extend(output.units);
            references.push((class.name.clone(), output.references));
        }
    }
    let class_units = units.len();

    let order = if session.hooks.needs_order() {
        init_order(program, program.entrypoint())
    } else {
        InitOrder::default()
    };

    let entry = emit_entry(session, &order.order)?;
    let entry_point = entry.class.clone();
    let entry_point_path = entry.path.clone();
    units.push(entry);

    let proxies = proxy_types(program).len();
    units.push(emit_reflection(session)?);

    let resources = resources(program);
    tracing::info!(
        classes = references.len(),
        units = class_units,
        proxies,
        resources = resources.len(),
        "generated program"
    );

    Ok(GeneratedProgram {
        units,
        entry_point,
        entry_point_path,
        resources,
        references,
        init_order: order,
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
