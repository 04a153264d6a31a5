use std::path::Path;

use async_trait::async_trait;
use oxc::span::SourceType;
use serde_json::{Number, Value};
use tracing::debug;

use super::syntax::{self, Import};
use super::{ModuleBindings, ModuleError, ModuleLoader};

/// The built-in module loader.
///
/// Executes config modules directly:
/// - `.js`, `.mjs`: ES modules, statically evaluated (see [`syntax`](super::syntax))
/// - `.json`: the whole document becomes the default export
/// - `.toml`: the whole table becomes the default export
///
/// Anything else, typed modules included, is reported as an unsupported
/// source kind. Relative imports must point at an existing file; package
/// imports cannot be resolved by this loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralModuleLoader;

impl LiteralModuleLoader {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Script,
    Json,
    Toml,
}

impl SourceKind {
    fn of(path: &Path) -> Result<Self, ModuleError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("js" | "mjs") => Ok(SourceKind::Script),
            Some("json") => Ok(SourceKind::Json),
            Some("toml") => Ok(SourceKind::Toml),
            other => Err(ModuleError::UnsupportedSourceKind {
                path: path.to_path_buf(),
                kind: other.map_or_else(|| "<none>".to_string(), |ext| format!(".{ext}")),
            }),
        }
    }
}

#[async_trait]
impl ModuleLoader for LiteralModuleLoader {
    async fn load(&self, path: &Path) -> Result<ModuleBindings, ModuleError> {
        let kind = SourceKind::of(path)?;
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ModuleError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), ?kind, "evaluating module");

        match kind {
            SourceKind::Script => {
                let module = syntax::parse(&source, SourceType::mjs())
                    .map_err(|e| e.into_module_error(path))?;
                check_imports(path, &module.imports, true).await?;
                Ok(module
                    .exports
                    .into_iter()
                    .map(|export| (export.name, export.value))
                    .collect())
            }
            SourceKind::Json => {
                let value: Value = serde_json::from_str(&source).map_err(|e| ModuleError::Syntax {
                    path: path.to_path_buf(),
                    line: e.line(),
                    column: e.column(),
                    message: e.to_string(),
                })?;
                Ok(ModuleBindings::with_default(value))
            }
            SourceKind::Toml => {
                let table: toml::Table = toml::from_str(&source).map_err(|e| {
                    let offset = e.span().map_or(0, |span| span.start);
                    let (line, column) = syntax::line_column(&source, offset);
                    ModuleError::Syntax {
                        path: path.to_path_buf(),
                        line,
                        column,
                        message: e.message().to_string(),
                    }
                })?;
                Ok(ModuleBindings::with_default(toml_to_json(
                    toml::Value::Table(table),
                )))
            }
        }
    }
}

/// Verifies that every relative import of `path` resolves to an existing file.
///
/// With `require_resolvable`, package imports are rejected as well. A
/// lookup that fails for any reason other than absence is a read error.
pub(super) async fn check_imports(
    path: &Path,
    imports: &[Import],
    require_resolvable: bool,
) -> Result<(), ModuleError> {
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    for import in imports {
        let found = if import.is_relative() {
            let target = base.join(&import.specifier);
            tokio::fs::try_exists(&target)
                .await
                .map_err(|source| ModuleError::Read {
                    path: target.clone(),
                    source,
                })?
        } else {
            !require_resolvable
        };

        if !found {
            return Err(ModuleError::MissingImport {
                path: path.to_path_buf(),
                specifier: import.specifier.clone(),
            });
        }
    }
    Ok(())
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}
