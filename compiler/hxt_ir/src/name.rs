//! Fully-qualified class names.

use std::fmt;

/// A dotted, fully-qualified class name (`java.lang.String`).
///
/// Inner classes keep their binary `$` separator (`a.b.Outer$Inner`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FqName(String);

impl FqName {
    pub fn new(name: impl Into<String>) -> Self {
        FqName(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Package part, empty for the default package.
    pub fn package(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// Last segment of the name.
    pub fn simple_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Slash-separated JVM internal name (`java/lang/String`).
    pub fn internal_name(&self) -> String {
        self.0.replace('.', "/")
    }

    /// Field descriptor for this class (`Ljava/lang/String;`).
    pub fn descriptor(&self) -> String {
        format!("L{};", self.internal_name())
    }

    /// Same package, simple name extended with `suffix`.
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> FqName {
        FqName(format!("{}{suffix}", self.0))
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FqName {
    fn from(name: &str) -> Self {
        FqName::new(name)
    }
}

impl From<String> for FqName {
    fn from(name: String) -> Self {
        FqName(name)
    }
}
