//! Structured configuration from typed module source files.
//!
//! A config module is executed through a [`ModuleLoader`](module::ModuleLoader);
//! when the loader cannot interpret the file it is compiled by a
//! [`Compiler`](module::Compiler) into a scratch file and executed from there.
//! Missing config files can be created from a default. Failures carry one
//! [`ErrorCause`](config::ErrorCause) callers can switch on.
//!
//! The free functions below use a [`ConfigResolver`] with the built-in loader
//! and compiler; build your own resolver to swap either.

use std::path::Path;

use serde::de::DeserializeOwned;

pub mod config;
mod error;
pub mod module;

pub use config::{
    ConfigError, ConfigObject, ConfigResolver, ConfigSchema, CreationRequest, ErrorCause,
    TypeConstraint,
};
pub use error::Error;

/// Resolves the config module at `path` with the default resolver.
pub async fn resolve(
    path: impl AsRef<Path>,
    creation: Option<CreationRequest>,
) -> Result<ConfigObject, Error> {
    ConfigResolver::new().resolve(path, creation).await
}

/// Resolves and validates the config module at `path` with the default resolver.
pub async fn resolve_validated<T, S>(
    path: impl AsRef<Path>,
    schema: &S,
    creation: Option<CreationRequest>,
) -> Result<T, Error>
where
    T: DeserializeOwned,
    S: ConfigSchema + ?Sized,
{
    ConfigResolver::new()
        .resolve_validated(path, schema, creation)
        .await
}

/// Writes a new config file at `path` from `request`.
pub async fn write(path: impl AsRef<Path>, request: &CreationRequest) -> Result<(), Error> {
    config::ConfigFileWriter::new()
        .write(path.as_ref(), request)
        .await
}
