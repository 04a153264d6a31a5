use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::exports::resolve_exports;
use super::fallback::CompileFallback;
use super::native::{NativeLoader, NativeOutcome};
use super::request::{ConfigObject, CreationRequest};
use super::schema::{ConfigSchema, Issue, ValidationErrors};
use super::writer::ConfigFileWriter;
use super::{ConfigError, FileNotFoundReason};
use crate::module::{Compiler, LiteralModuleLoader, ModuleLoader, TypeStripCompiler};
use crate::Error;

const DEFAULT_SCRATCH_EXTENSION: &str = "mjs";

/// Resolves config modules into configuration objects.
///
/// Each call validates the path, creates the file from a
/// [`CreationRequest`] when it is missing, executes it (compiling it first if
/// the loader cannot run it directly) and picks the exported config object.
/// Calls share no state beyond the filesystem.
///
/// ## Example
///
/// ```no_run
/// use modconf::config::{ConfigResolver, CreationRequest};
/// use serde_json::json;
///
/// # async fn run() -> Result<(), modconf::Error> {
/// let defaults = json!({"port": 8080}).as_object().cloned().unwrap_or_default();
/// let config = ConfigResolver::new()
///     .resolve(
///         "/srv/app/app.config.ts",
///         Some(CreationRequest::new(defaults).immediately_use(true)),
///     )
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    native: NativeLoader,
    fallback: CompileFallback,
    writer: ConfigFileWriter,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolver {
    /// A resolver using the built-in loader and compiler.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ConfigResolverBuilder {
        ConfigResolverBuilder::default()
    }

    /// Resolves the config module at `path`.
    ///
    /// `path` must be absolute. If nothing exists there, `creation` decides
    /// what happens: without it the call fails with `file_not_found`; with
    /// it a new file is written and either the default is returned
    /// (`immediately_use`) or the call fails with `halt_and_check`.
    pub async fn resolve(
        &self,
        path: impl AsRef<Path>,
        creation: Option<CreationRequest>,
    ) -> Result<ConfigObject, Error> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
                reason: FileNotFoundReason::NotAbsolute,
            }
            .into());
        }

        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if !exists {
            let Some(request) = creation else {
                return Err(ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                    reason: FileNotFoundReason::Missing,
                }
                .into());
            };

            debug!(path = %path.display(), immediately_use = request.immediately_use, "config file missing, creating it");
            self.writer.write(path, &request).await?;
            if request.immediately_use {
                return Ok(request.default_config);
            }
            return Err(ConfigError::HaltAndCheck(path.to_path_buf()).into());
        }

        let bindings = match self.native.load(path).await {
            NativeOutcome::Loaded(bindings) => bindings,
            NativeOutcome::Incapable(_) => {
                debug!(path = %path.display(), "falling back to compilation");
                self.fallback.compile_and_load(path).await?
            }
            NativeOutcome::Failed(err) => return Err(err.into()),
        };

        Ok(resolve_exports(path, bindings)?)
    }

    /// Like [`resolve`](Self::resolve), checking both the creation default and
    /// the loaded config against `schema`, then deserializing into `T`.
    ///
    /// A default that fails the schema is rejected with
    /// `invalid_default_config_format` before anything is written. Fields
    /// `T` does not declare are dropped by deserialization.
    pub async fn resolve_validated<T, S>(
        &self,
        path: impl AsRef<Path>,
        schema: &S,
        creation: Option<CreationRequest>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        S: ConfigSchema + ?Sized,
    {
        let path = path.as_ref();

        if let Some(request) = &creation {
            schema
                .validate(&Value::Object(request.default_config.clone()))
                .map_err(ConfigError::InvalidDefaultConfigFormat)?;
        }

        let config = Value::Object(self.resolve(path, creation).await?);

        let invalid = |issues: ValidationErrors| ConfigError::InvalidConfigFormat {
            path: path.to_path_buf(),
            issues,
        };
        schema.validate(&config).map_err(invalid)?;
        let typed = serde_json::from_value(config)
            .map_err(|e| invalid(Issue::root(e.to_string()).into()))?;
        Ok(typed)
    }

    /// Writes a new config file without loading it.
    pub async fn write(&self, path: impl AsRef<Path>, request: &CreationRequest) -> Result<(), Error> {
        self.writer.write(path.as_ref(), request).await
    }
}

/// Builder for [`ConfigResolver`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ConfigResolverBuilder {
    loader: Option<Arc<dyn ModuleLoader>>,
    compiler: Option<Arc<dyn Compiler>>,
    scratch_dir: Option<PathBuf>,
    scratch_extension: Option<String>,
}

impl ConfigResolverBuilder {
    /// Sets the loader used for config files and compiled scratch files.
    ///
    /// Defaults to [`LiteralModuleLoader`].
    pub fn with_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Sets the compiler used when the loader cannot run a file directly.
    ///
    /// Defaults to [`TypeStripCompiler`].
    pub fn with_compiler(mut self, compiler: impl Compiler + 'static) -> Self {
        self.compiler = Some(Arc::new(compiler));
        self
    }

    /// Directory for compiled scratch files. Defaults to the system
    /// temporary directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// File extension given to compiled scratch files, without the dot.
    /// Defaults to `mjs`.
    pub fn with_scratch_extension(mut self, extension: impl Into<String>) -> Self {
        self.scratch_extension = Some(extension.into());
        self
    }

    pub fn build(self) -> ConfigResolver {
        let loader = self
            .loader
            .unwrap_or_else(|| Arc::new(LiteralModuleLoader::new()));
        let compiler = self
            .compiler
            .unwrap_or_else(|| Arc::new(TypeStripCompiler::new()));
        let scratch_dir = self.scratch_dir.unwrap_or_else(std::env::temp_dir);
        let extension = self
            .scratch_extension
            .unwrap_or_else(|| DEFAULT_SCRATCH_EXTENSION.to_string());

        ConfigResolver {
            native: NativeLoader::new(loader.clone()),
            fallback: CompileFallback::new(compiler, loader, scratch_dir, extension),
            writer: ConfigFileWriter::new(),
        }
    }
}
