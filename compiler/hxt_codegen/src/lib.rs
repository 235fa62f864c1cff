//! Haxe Backend for hxt
//!
//! This crate turns a resolved [`hxt_ir::Program`] into Haxe source while
//! keeping source-platform semantics: wrapping 32-bit arithmetic, 64-bit
//! integers through `haxe.Int64`, boxing and unboxing, exception identity,
//! static initialization order and runtime reflection.
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=hxt_codegen=debug`: one line per generated class plus the
//!   init order and pass summary.
//!   Example: `RUST_LOG=hxt_codegen=debug cargo test`
//!
//! - `RUST_LOG=hxt_codegen=trace`: also report policy skips (native
//!   classes, interfaces without a functional adapter).
//!
//! # Architecture
//!
//! - **Session** (`context.rs`): read-only state of one pass; `EmitCx`
//!   holds the per-class reference and init-dependency accumulators
//! - **Emitters** (`haxe/`): casts, expressions, statements, classes
//! - **Init strategies** (`init.rs`): eager, lazy and unordered behind one
//!   hook trait
//! - **Orderer** (`order.rs`): static init order with cycle breaking
//! - **Reflection** (`reflection.rs`): registration functions, name
//!   dispatchers and annotation proxies
//! - **Pass** (`pipeline.rs`): [`generate`] runs all of the above
//!
//! Identifier choice and mapping tables are injected through
//! [`NameResolver`] and [`Mappings`]; [`HaxeNames`] and [`MappingTable`]
//! are the defaults.

mod context;
mod entry;
mod error;
pub mod haxe;
mod init;
mod mappings;
mod names;
mod options;
mod order;
mod pipeline;
mod reflection;
mod services;
mod template;

#[cfg(test)]
mod test_helpers;

pub use context::{CodeWriter, EmitCx, Session};
pub use entry::emit_entry;
pub use error::{CodegenError, Result};
pub use init::{InitHooks, InitMode, ParseInitModeError, STATIC_INIT_FN, STATIC_INIT_LATCH};
pub use mappings::MappingTable;
pub use names::HaxeNames;
pub use options::CodegenOptions;
pub use order::{init_order, static_dependencies, InitOrder};
pub use pipeline::{generate, GeneratedProgram, GeneratedUnit};
pub use reflection::{emit_reflection, proxy_types};
pub use services::{Accessor, Mappings, NameResolver};
pub use template::substitute;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=hxt_codegen=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
