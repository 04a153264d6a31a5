//! Module execution and compilation capabilities.
//!
//! The resolution pipeline never interprets source files itself. It asks a
//! [`ModuleLoader`] to execute a file and hand back its exported bindings,
//! and a [`Compiler`] to turn a file the loader cannot run into code it can.
//! Both are injected, so hosts and tests can swap in their own.

mod compiler;
mod error;
mod literal;
pub mod syntax;

use std::path::Path;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use compiler::{CommandCompiler, TypeStripCompiler};
pub use error::ModuleError;
pub use literal::LiteralModuleLoader;

/// Reserved binding name of a module's default export.
pub const DEFAULT_EXPORT: &str = "default";

/// Name to value exports produced by executing a module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleBindings {
    exports: Map<String, Value>,
}

impl ModuleBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings holding only a default export.
    pub fn with_default(value: Value) -> Self {
        let mut bindings = Self::new();
        bindings.insert(DEFAULT_EXPORT, value);
        bindings
    }

    /// Adds or replaces a binding.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.exports.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.exports.get(name)
    }

    pub fn default_export(&self) -> Option<&Value> {
        self.exports.get(DEFAULT_EXPORT)
    }

    /// Every binding except the default export, in declaration order.
    pub fn named(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.exports
            .iter()
            .filter(|(name, _)| name.as_str() != DEFAULT_EXPORT)
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }

    /// Consumes the bindings, returning the value bound to `name`.
    pub fn take(mut self, name: &str) -> Option<Value> {
        self.exports.remove(name)
    }
}

impl FromIterator<(String, Value)> for ModuleBindings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            exports: iter.into_iter().collect(),
        }
    }
}

/// Executes a module by file path and returns its exported bindings.
///
/// Implementations report a source kind they cannot interpret with
/// [`ModuleError::UnsupportedSourceKind`]; that is the only failure the
/// resolver answers by compiling the file first.
#[async_trait]
pub trait ModuleLoader: Send + Sync + std::fmt::Debug {
    async fn load(&self, path: &Path) -> Result<ModuleBindings, ModuleError>;
}

/// Translates a source file into code a [`ModuleLoader`] can execute.
///
/// Local relative imports are expected to be folded into the output so the
/// result is self-contained. `Ok(None)` means the compiler ran but produced
/// no output.
#[async_trait]
pub trait Compiler: Send + Sync + std::fmt::Debug {
    async fn compile(&self, path: &Path) -> Result<Option<String>, ModuleError>;
}
