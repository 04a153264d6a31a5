use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a [`ModuleLoader`](super::ModuleLoader) or a
/// [`Compiler`](super::Compiler).
///
/// Only [`ModuleError::UnsupportedSourceKind`] means "this environment cannot
/// interpret the file"; every other variant is a real problem in the module
/// and is surfaced to the caller unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModuleError {
    #[error("unsupported source kind '{kind}' for module '{path}'")]
    UnsupportedSourceKind { path: PathBuf, kind: String },

    #[error("syntax error in '{path}' at {line}:{column}: {message}")]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("cannot resolve import '{specifier}' from '{path}'")]
    MissingImport { path: PathBuf, specifier: String },

    #[error("failed to evaluate module '{path}': {message}")]
    Evaluation { path: PathBuf, message: String },

    #[error("failed to compile '{path}': {message}")]
    Compile { path: PathBuf, message: String },

    #[error("failed to read module '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ModuleError {
    /// Whether the failure only says the loader cannot handle this kind of source.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ModuleError::UnsupportedSourceKind { .. })
    }
}
