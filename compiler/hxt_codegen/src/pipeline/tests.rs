use pretty_assertions::assert_eq;

use hxt_ir::{
    Annotation, AnnotationValue, ClassKind, Expr, Literal, Modifiers, Stmt, Type,
};

use super::*;
use crate::error::CodegenError;
use crate::init::InitMode;
use crate::mappings::MappingTable;
use crate::names::HaxeNames;
use crate::test_helpers::{method, runtime_program};

fn main_class() -> Class {
    Class::new("app.Main", ClassKind::Class)
        .with_method(method(
            "main",
            &[Type::array(Type::string())],
            Type::Void,
            Modifiers::PUBLIC | Modifiers::STATIC,
            vec![Stmt::Return(None)],
        ))
        .with_annotation(Annotation::new(annotations::ADD_FILES).with_element(
            "value",
            AnnotationValue::List(vec![
                AnnotationValue::Literal(Literal::string("assets/logo.png")),
                AnnotationValue::Literal(Literal::string("assets/font.ttf")),
            ]),
        ))
}

fn program() -> Program {
    runtime_program("app.Main")
        .with_class(main_class())
        .with_class(
            Class::new("app.Native", ClassKind::Class)
                .with_origin(ClassOrigin::Native { native_name: None }),
        )
        .with_class(Class::new("app.Prebuilt", ClassKind::Class).with_origin(
            ClassOrigin::External {
                source: "class Prebuilt_ {}\n".to_string(),
            },
        ))
}

fn run(program: &Program, options: &CodegenOptions) -> Result<GeneratedProgram> {
    let names = HaxeNames::new(program);
    generate(program, &names, &MappingTable::new(), options)
}

fn paths(generated: &GeneratedProgram) -> Vec<&str> {
    generated.units.iter().map(|unit| unit.path.as_str()).collect()
}

#[test]
fn units_follow_input_order_then_entry_and_reflection() {
    let generated = run(&program(), &CodegenOptions::default()).unwrap();
    assert_eq!(
        paths(&generated),
        vec![
            "java_/lang/Object_.hx",
            "java_/lang/Integer_.hx",
            "java_/lang/String_.hx",
            "app/Main_.hx",
            "app/Prebuilt_.hx",
            "app/Main_EntryPoint_.hx",
            "HaxeReflectionInfo.hx",
        ]
    );
    assert_eq!(generated.entry_point.as_str(), "app.Main_EntryPoint");
    assert_eq!(generated.entry_point_path, "app/Main_EntryPoint_.hx");
}

#[test]
fn external_classes_pass_through_verbatim() {
    let generated = run(&program(), &CodegenOptions::default()).unwrap();
    let unit = generated.unit("app/Prebuilt_.hx").unwrap();
    assert_eq!(unit.source, "class Prebuilt_ {}\n");
}

#[test]
fn native_classes_emit_nothing() {
    let generated = run(&program(), &CodegenOptions::default()).unwrap();
    assert!(generated.unit("app/Native_.hx").is_none());
    assert!(generated
        .references
        .iter()
        .all(|(class, _)| class.as_str() != "app.Native"));
}

#[test]
fn resources_are_collected() {
    let generated = run(&program(), &CodegenOptions::default()).unwrap();
    assert_eq!(generated.resources, vec!["assets/logo.png", "assets/font.ttf"]);
}

#[test]
fn parallel_and_sequential_output_match() {
    let program = program();
    let parallel = run(&program, &CodegenOptions::default()).unwrap();
    let sequential = run(&program, &CodegenOptions::default().with_parallel(false)).unwrap();
    assert_eq!(parallel.units, sequential.units);
    assert_eq!(parallel.references, sequential.references);
}

#[test]
fn order_is_computed_only_when_eager() {
    let program = program();
    let lazy = run(&program, &CodegenOptions::default()).unwrap();
    assert_eq!(lazy.init_order, InitOrder::default());

    let eager = run(
        &program,
        &CodegenOptions::default().with_init_mode(InitMode::Eager),
    )
    .unwrap();
    let order: Vec<&str> = eager.init_order.order.iter().map(FqName::as_str).collect();
    assert_eq!(order, vec!["java.lang.Object", "app.Main"]);
    let entry = eager.unit("app/Main_EntryPoint_.hx").unwrap();
    assert!(entry.source.contains("\t\tapp.Main_.__hx_static__init__();\n"));
}

#[test]
fn first_error_aborts_the_pass() {
    let broken = Class::new("app.Broken", ClassKind::Class).with_method(method(
        "bad",
        &[],
        Type::Void,
        Modifiers::PUBLIC | Modifiers::STATIC,
        vec![Stmt::Expr(Expr::cast(
            Expr::local("s", Type::string()),
            Type::INT,
        ))],
    ));
    let program = program().with_class(broken);
    for parallel in [true, false] {
        let err = run(&program, &CodegenOptions::default().with_parallel(parallel)).unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedCast { .. }));
    }
}
