use std::ffi::{OsStr, OsString};
use std::path::Path;

use async_trait::async_trait;
use oxc::span::SourceType;
use tracing::debug;

use super::literal::check_imports;
use super::syntax;
use super::{Compiler, ModuleError};

/// The built-in compiler for typed config modules.
///
/// Parses the file with oxc (TypeScript, JSX and JavaScript flavours, picked
/// by extension), evaluates its exports and re-emits them as a plain ES
/// module of literals. Types vanish with evaluation. Imported values cannot
/// be evaluated, so every import is elided after checking that relative ones
/// point at existing files. A module without value exports produces no
/// output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeStripCompiler;

impl TypeStripCompiler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Compiler for TypeStripCompiler {
    async fn compile(&self, path: &Path) -> Result<Option<String>, ModuleError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ModuleError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::ts());
        let module =
            syntax::parse(&source, source_type).map_err(|e| e.into_module_error(path))?;
        check_imports(path, &module.imports, false).await?;

        debug!(
            path = %path.display(),
            imports = module.imports.len(),
            exports = module.exports.len(),
            "stripped types from module"
        );

        if module.exports.is_empty() {
            return Ok(None);
        }
        Ok(Some(module.to_script()))
    }
}

/// Runs an external compiler program.
///
/// The source path is appended to the configured arguments and the
/// program's stdout is taken as the compiled module. A non-zero exit status
/// is a compile error carrying stderr; empty stdout means no output.
///
/// ```no_run
/// use modconf::module::CommandCompiler;
///
/// let compiler = CommandCompiler::new("npx").args(["esbuild", "--bundle", "--format=esm"]);
/// ```
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandCompiler {
    /// Creates a compiler that runs `program` with no extra arguments.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: Vec::new(),
        }
    }

    /// esbuild, bundling local imports into a single ES module on stdout.
    pub fn esbuild() -> Self {
        Self::new("esbuild").args([
            "--bundle",
            "--format=esm",
            "--platform=node",
            "--log-level=error",
        ])
    }

    /// Adds a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_owned()));
        self
    }

    fn failure(&self, path: &Path, message: impl Into<String>) -> ModuleError {
        ModuleError::Compile {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Compiler for CommandCompiler {
    async fn compile(&self, path: &Path) -> Result<Option<String>, ModuleError> {
        let program = which::which(&self.program).map_err(|e| {
            let message = format!(
                "compiler '{}' not found: {e}",
                self.program.to_string_lossy()
            );
            self.failure(path, message)
        })?;

        debug!(program = %program.display(), path = %path.display(), "running external compiler");

        let output = tokio::process::Command::new(&program)
            .args(&self.args)
            .arg(path)
            .output()
            .await
            .map_err(|e| self.failure(path, format!("failed to run compiler: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("compiler exited with {}", output.status),
                stderr => stderr.to_string(),
            };
            return Err(self.failure(path, message));
        }

        let code = String::from_utf8(output.stdout)
            .map_err(|_| self.failure(path, "compiler output is not valid UTF-8"))?;
        if code.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::syntax::parse;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_strips_types_and_imports() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("types.ts"), "export interface Cfg { a: number }").unwrap();
        let path = dir.path().join("config.ts");
        std::fs::write(
            &path,
            "import type {Cfg} from \"./types.ts\";\nimport {Other} from \"some-package\";\n\nexport const config = {\n    a: 1, // one\n} satisfies Cfg;\n",
        )
        .unwrap();

        let code = TypeStripCompiler.compile(&path).await.unwrap().unwrap();
        let module = parse(&code, SourceType::mjs()).unwrap();

        assert!(module.imports.is_empty());
        assert_eq!(module.exports[0].value, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_no_value_exports_means_no_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.ts");
        std::fs::write(&path, "export type Port = number;\n").unwrap();

        assert_eq!(TypeStripCompiler.compile(&path).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_type_import_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ts");
        std::fs::write(
            &path,
            "import type {Cfg} from \"types.ts\";\nimport type {Cfg2} from \"./missing.ts\";\nexport default {};",
        )
        .unwrap();

        let err = TypeStripCompiler.compile(&path).await.unwrap_err();
        assert!(
            matches!(err, ModuleError::MissingImport { ref specifier, .. } if specifier == "./missing.ts")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_compiler_uses_stdout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ts");
        std::fs::write(&path, "export default {};\n").unwrap();

        let code = CommandCompiler::new("cat").compile(&path).await.unwrap();
        assert_eq!(code.as_deref(), Some("export default {};\n"));

        let empty = CommandCompiler::new("true").compile(&path).await.unwrap();
        assert_eq!(empty, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_compiler_failures() {
        let path = Path::new("/tmp/config.ts");

        let err = CommandCompiler::new("false").compile(path).await.unwrap_err();
        assert!(matches!(err, ModuleError::Compile { .. }));

        let err = CommandCompiler::new("modconf-no-such-compiler")
            .compile(path)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
