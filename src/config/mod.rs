//! Configuration resolution.
//!
//! [`ConfigResolver`] turns an absolute path to a config module into a
//! configuration object: it creates missing files from a
//! [`CreationRequest`], runs the module through the configured loader
//! (compiling it first when needed) and picks the exported object.
//! [`ConfigResolver::resolve_validated`] adds schema checks on both ends.

mod error;
mod exports;
mod fallback;
mod native;
mod request;
mod resolver;
mod schema;
mod writer;

pub use error::{ConfigError, ErrorCause, FileNotFoundReason};
pub use exports::resolve_exports;
pub use fallback::CompileFallback;
pub use native::{NativeLoader, NativeOutcome};
pub use request::{ConfigObject, CreationRequest, TypeConstraint, TypeSource};
pub use resolver::{ConfigResolver, ConfigResolverBuilder};
pub use schema::{schema_validator, ConfigSchema, Issue, ValidationErrors};
pub use writer::{relative_import, ConfigFileWriter, CONFIG_IDENTIFIER, REVIEW_BANNER};
