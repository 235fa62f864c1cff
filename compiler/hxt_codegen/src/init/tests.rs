use pretty_assertions::assert_eq;

use hxt_ir::Program;

use super::*;
use crate::names::HaxeNames;

fn static_init_text(mode: InitMode, clinit: Option<&str>) -> String {
    let mut w = CodeWriter::new();
    mode.hooks().static_init(&mut w, clinit);
    w.take_output()
}

#[test]
fn parses_and_displays_modes() {
    for mode in [InitMode::Eager, InitMode::Lazy, InitMode::Unordered] {
        assert_eq!(mode.to_string().parse::<InitMode>(), Ok(mode));
        assert_eq!(mode.hooks().mode(), mode);
    }
    assert_eq!(" EAGER ".parse::<InitMode>(), Ok(InitMode::Eager));
    assert!("sometimes".parse::<InitMode>().is_err());
}

#[test]
fn lazy_guards_with_latch() {
    assert_eq!(
        static_init_text(InitMode::Lazy, Some("_clinit___V")),
        "static public var __hx_static__init__initialized_:Bool = false;\n\
         static public function __hx_static__init__() {\n\
         \tif (__hx_static__init__initialized_) return;\n\
         \t__hx_static__init__initialized_ = true;\n\
         \t_clinit___V();\n\
         }\n"
    );
}

#[test]
fn eager_has_no_guard() {
    assert_eq!(
        static_init_text(InitMode::Eager, None),
        "static public function __hx_static__init__() {\n}\n"
    );
}

#[test]
fn unordered_registers_loader_hook() {
    let text = static_init_text(InitMode::Unordered, Some("_clinit___V"));
    assert!(text.ends_with("static function __init__() { __hx_static__init__(); }\n"));
    assert!(!text.contains(STATIC_INIT_LATCH));
}

#[test]
fn only_lazy_touches_in_method_prologue() {
    let program = Program::new("app.Main");
    let names = HaxeNames::new(&program);
    let deps = [FqName::new("app.Config")];
    for (mode, expected) in [
        (InitMode::Lazy, "app.Config_.__hx_static__init__();\n"),
        (InitMode::Eager, ""),
        (InitMode::Unordered, ""),
    ] {
        let mut w = CodeWriter::new();
        mode.hooks().static_touch(&mut w, &names, &deps);
        assert_eq!(w.take_output(), expected);
    }
}

#[test]
fn only_eager_bootstraps() {
    let program = Program::new("app.Main");
    let names = HaxeNames::new(&program);
    let order = [FqName::new("app.Base"), FqName::new("app.Main")];
    assert_eq!(
        InitMode::Eager.hooks().bootstrap(&names, &order),
        vec![
            "app.Base_.__hx_static__init__();".to_string(),
            "app.Main_.__hx_static__init__();".to_string(),
        ]
    );
    assert!(InitMode::Eager.hooks().needs_order());
    assert!(InitMode::Lazy.hooks().bootstrap(&names, &order).is_empty());
    assert!(!InitMode::Unordered.hooks().needs_order());
}
