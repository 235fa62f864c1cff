//! Per-pass configuration.

use crate::init::InitMode;

/// Options for one generation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Static initialization strategy.
    pub init_mode: InitMode,
    /// Appended to the entry class name to form the entrypoint class.
    pub entry_suffix: String,
    /// Name of the reflection metadata unit.
    pub reflection_unit: String,
    /// Emit classes on the rayon pool. Output order is the same either way.
    pub parallel: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            init_mode: InitMode::default(),
            entry_suffix: "_EntryPoint".to_string(),
            reflection_unit: "HaxeReflectionInfo".to_string(),
            parallel: true,
        }
    }
}

impl CodegenOptions {
    #[must_use]
    pub fn with_init_mode(mut self, init_mode: InitMode) -> Self {
        self.init_mode = init_mode;
        self
    }

    #[must_use]
    pub fn with_entry_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.entry_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_reflection_unit(mut self, name: impl Into<String>) -> Self {
        self.reflection_unit = name.into();
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let options = CodegenOptions::default();
        assert_eq!(options.init_mode, InitMode::Lazy);
        assert_eq!(options.entry_suffix, "_EntryPoint");
        assert_eq!(options.reflection_unit, "HaxeReflectionInfo");
        assert!(options.parallel);
    }

    #[test]
    fn builder_overrides() {
        let options = CodegenOptions::default()
            .with_init_mode(InitMode::Eager)
            .with_entry_suffix("_Main")
            .with_reflection_unit("app.Reflect")
            .with_parallel(false);
        assert_eq!(options.init_mode, InitMode::Eager);
        assert_eq!(options.entry_suffix, "_Main");
        assert_eq!(options.reflection_unit, "app.Reflect");
        assert!(!options.parallel);
    }
}
