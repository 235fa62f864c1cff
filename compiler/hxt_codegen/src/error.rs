//! Code generation errors.
//!
//! Every failure is fatal to the pass: a construct without a translation
//! rule aborts rather than emit code that might silently change meaning.

use crate::haxe::cast::UnsupportedCast;

/// A fatal code generation error.
///
/// `site` names the fully-qualified class being emitted, followed by
/// `::method(descriptor)` when the failure happened inside a method body.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    #[error("{site}: unsupported {what}")]
    Unsupported { site: String, what: String },

    #[error("{site}: unsupported cast from {from} to {to}")]
    UnsupportedCast { site: String, from: String, to: String },

    #[error("{site}: can't find {what} {name}")]
    Lookup {
        site: String,
        what: &'static str,
        name: String,
    },
}

impl CodegenError {
    pub fn unsupported(site: impl Into<String>, what: impl Into<String>) -> Self {
        CodegenError::Unsupported {
            site: site.into(),
            what: what.into(),
        }
    }

    pub fn lookup(site: impl Into<String>, what: &'static str, name: impl ToString) -> Self {
        CodegenError::Lookup {
            site: site.into(),
            what,
            name: name.to_string(),
        }
    }

    /// Attaches the emission site to a cast resolver failure.
    pub fn from_cast(site: impl Into<String>, err: UnsupportedCast) -> Self {
        CodegenError::UnsupportedCast {
            site: site.into(),
            from: err.from,
            to: err.to,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodegenError>;
