use std::path::PathBuf;

use crate::config::{ConfigError, ErrorCause};
use crate::module::ModuleError;
use thiserror::Error;

/// Top-level error type for the modconf library.
///
/// [`Error::Config`] carries one tagged [`ErrorCause`]; callers should branch
/// on [`Error::cause`] rather than on message text. The other variants are
/// real failures (a broken config module, an unwritable directory) passed
/// through as they occurred.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("config module error: {0}")]
    Module(#[from] ModuleError),

    #[error("i/o error at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    /// Whether this error is one of the tagged configuration failures.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// The tagged cause, if this is a configuration failure.
    pub fn cause(&self) -> Option<ErrorCause> {
        match self {
            Error::Config(err) => Some(err.cause()),
            _ => None,
        }
    }
}
