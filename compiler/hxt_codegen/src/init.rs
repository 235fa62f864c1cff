//! Static initialization strategies.
//!
//! The mode is resolved once per pass into an [`InitHooks`] strategy; the
//! emitters call the same hooks whatever the mode and never branch on it.

use std::fmt;
use std::str::FromStr;

use hxt_ir::FqName;

use crate::context::CodeWriter;
use crate::services::NameResolver;

/// Name of the generated per-class static initializer.
pub const STATIC_INIT_FN: &str = "__hx_static__init__";
/// Latch preventing re-entrant initialization under [`InitMode::Lazy`].
pub const STATIC_INIT_LATCH: &str = "__hx_static__init__initialized_";

/// When static initializers run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InitMode {
    /// All reachable initializers run at program entry in dependency order.
    Eager,
    /// Each class initializes itself on first static touch or construction.
    #[default]
    Lazy,
    /// The target's module loader runs initializers in its own order.
    Unordered,
}

impl InitMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            InitMode::Eager => "eager",
            InitMode::Lazy => "lazy",
            InitMode::Unordered => "unordered",
        }
    }

    /// The strategy object for this mode.
    pub fn hooks(self) -> &'static dyn InitHooks {
        match self {
            InitMode::Eager => &Eager,
            InitMode::Lazy => &Lazy,
            InitMode::Unordered => &Unordered,
        }
    }
}

impl fmt::Display for InitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized init mode name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown init mode `{0}` (expected eager, lazy or unordered)")]
pub struct ParseInitModeError(String);

impl FromStr for InitMode {
    type Err = ParseInitModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager" => Ok(InitMode::Eager),
            "lazy" => Ok(InitMode::Lazy),
            "unordered" => Ok(InitMode::Unordered),
            _ => Err(ParseInitModeError(s.to_string())),
        }
    }
}

/// Hooks every emitter calls regardless of the selected mode.
pub trait InitHooks: Sync {
    fn mode(&self) -> InitMode;

    /// Runs in the generated constructor, right after `super()`.
    fn class_enter(&self, w: &mut CodeWriter);

    /// Emits the class's static initializer members. `clinit` is the
    /// generated name of the class's `<clinit>` method, if any.
    fn static_init(&self, w: &mut CodeWriter, clinit: Option<&str>);

    /// Method-body prologue for the classes the body touches statically.
    fn static_touch(&self, w: &mut CodeWriter, names: &dyn NameResolver, deps: &[FqName]);

    /// Whether [`bootstrap`](Self::bootstrap) needs the dependency order.
    fn needs_order(&self) -> bool {
        false
    }

    /// Entrypoint statements run before `main`.
    fn bootstrap(&self, names: &dyn NameResolver, order: &[FqName]) -> Vec<String>;

    /// Whether registering a class for reflection must initialize it.
    /// Only latched initializers are safe to call more than once.
    fn init_on_reflect(&self) -> bool {
        false
    }
}

fn init_call(names: &dyn NameResolver, class: &FqName) -> String {
    format!("{}.{STATIC_INIT_FN}();", names.static_owner(class))
}

fn open_init_fn(w: &mut CodeWriter) {
    w.open(&format!("static public function {STATIC_INIT_FN}()"));
}

fn call_clinit(w: &mut CodeWriter, clinit: Option<&str>) {
    if let Some(clinit) = clinit {
        w.writeln(&format!("{clinit}();"));
    }
}

struct Eager;

impl InitHooks for Eager {
    fn mode(&self) -> InitMode {
        InitMode::Eager
    }

    fn class_enter(&self, _w: &mut CodeWriter) {}

    fn static_init(&self, w: &mut CodeWriter, clinit: Option<&str>) {
        open_init_fn(w);
        call_clinit(w, clinit);
        w.close();
    }

    fn static_touch(&self, _w: &mut CodeWriter, _names: &dyn NameResolver, _deps: &[FqName]) {}

    fn needs_order(&self) -> bool {
        true
    }

    fn bootstrap(&self, names: &dyn NameResolver, order: &[FqName]) -> Vec<String> {
        order.iter().map(|class| init_call(names, class)).collect()
    }
}

struct Lazy;

impl InitHooks for Lazy {
    fn mode(&self) -> InitMode {
        InitMode::Lazy
    }

    fn class_enter(&self, w: &mut CodeWriter) {
        w.writeln(&format!("{STATIC_INIT_FN}();"));
    }

    fn static_init(&self, w: &mut CodeWriter, clinit: Option<&str>) {
        w.writeln(&format!("static public var {STATIC_INIT_LATCH}:Bool = false;"));
        open_init_fn(w);
        w.writeln(&format!("if ({STATIC_INIT_LATCH}) return;"));
        w.writeln(&format!("{STATIC_INIT_LATCH} = true;"));
        call_clinit(w, clinit);
        w.close();
    }

    fn static_touch(&self, w: &mut CodeWriter, names: &dyn NameResolver, deps: &[FqName]) {
        for class in deps {
            w.writeln(&init_call(names, class));
        }
    }

    fn bootstrap(&self, _names: &dyn NameResolver, _order: &[FqName]) -> Vec<String> {
        Vec::new()
    }

    fn init_on_reflect(&self) -> bool {
        true
    }
}

struct Unordered;

impl InitHooks for Unordered {
    fn mode(&self) -> InitMode {
        InitMode::Unordered
    }

    fn class_enter(&self, _w: &mut CodeWriter) {}

    fn static_init(&self, w: &mut CodeWriter, clinit: Option<&str>) {
        open_init_fn(w);
        call_clinit(w, clinit);
        w.close();
        w.writeln(&format!("static function __init__() {{ {STATIC_INIT_FN}(); }}"));
    }

    fn static_touch(&self, _w: &mut CodeWriter, _names: &dyn NameResolver, _deps: &[FqName]) {}

    fn bootstrap(&self, _names: &dyn NameResolver, _order: &[FqName]) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests;
