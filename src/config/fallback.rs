use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempPath;
use tracing::{debug, warn};

use super::ConfigError;
use crate::module::{Compiler, ModuleBindings, ModuleLoader};
use crate::Error;

const SCRATCH_PREFIX: &str = "modconf-";

/// Compiles a config module, writes the output to a scratch file and
/// executes that instead.
///
/// Scratch files get random, exclusively created names, so concurrent calls
/// never collide. They are removed on every exit path: after the load
/// returns, when it fails, and when the call is dropped midway.
#[derive(Debug, Clone)]
pub struct CompileFallback {
    compiler: Arc<dyn Compiler>,
    loader: Arc<dyn ModuleLoader>,
    scratch_dir: PathBuf,
    extension: String,
}

impl CompileFallback {
    pub fn new(
        compiler: Arc<dyn Compiler>,
        loader: Arc<dyn ModuleLoader>,
        scratch_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            compiler,
            loader,
            scratch_dir: scratch_dir.into(),
            extension: extension.into(),
        }
    }

    pub async fn compile_and_load(&self, path: &Path) -> Result<ModuleBindings, Error> {
        let Some(code) = self.compiler.compile(path).await? else {
            return Err(ConfigError::TranspileFailed(path.to_path_buf()).into());
        };

        let scratch = self.write_scratch(code).await?;
        debug!(source = %path.display(), scratch = %scratch.display(), "loading compiled module");

        let result = self.loader.load(&scratch).await;
        remove_scratch(scratch);
        Ok(result?)
    }

    async fn write_scratch(&self, code: String) -> Result<TempPath, Error> {
        let dir = self.scratch_dir.clone();
        let suffix = format!(".{}", self.extension);

        let created = tokio::task::spawn_blocking(move || -> std::io::Result<TempPath> {
            std::fs::create_dir_all(&dir)?;
            let mut file = tempfile::Builder::new()
                .prefix(SCRATCH_PREFIX)
                .suffix(&suffix)
                .tempfile_in(&dir)?;
            file.write_all(code.as_bytes())?;
            file.flush()?;
            Ok(file.into_temp_path())
        })
        .await
        .map_err(std::io::Error::other)
        .and_then(|result| result);

        created.map_err(|source| Error::Io {
            path: self.scratch_dir.clone(),
            source,
        })
    }
}

/// Deletes a scratch file. Failures are logged and otherwise ignored.
fn remove_scratch(scratch: TempPath) {
    let shown = scratch.to_path_buf();
    if let Err(e) = scratch.close() {
        warn!(path = %shown.display(), error = %e, "failed to remove scratch file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{LiteralModuleLoader, ModuleError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::Barrier;

    #[derive(Debug)]
    struct FixedCompiler(Option<&'static str>);

    #[async_trait]
    impl Compiler for FixedCompiler {
        async fn compile(&self, _path: &Path) -> Result<Option<String>, ModuleError> {
            Ok(self.0.map(str::to_string))
        }
    }

    /// Records the scratch path, then behaves according to `mode`.
    #[derive(Debug)]
    struct ProbeLoader {
        seen: Mutex<Option<PathBuf>>,
        mode: Mode,
    }

    #[derive(Debug, Clone, Copy)]
    enum Mode {
        Delegate,
        Fail,
        Hang,
    }

    impl ProbeLoader {
        fn new(mode: Mode) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(None),
                mode,
            })
        }

        fn seen(&self) -> PathBuf {
            self.seen.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl ModuleLoader for ProbeLoader {
        async fn load(&self, path: &Path) -> Result<ModuleBindings, ModuleError> {
            assert!(path.exists());
            *self.seen.lock().unwrap() = Some(path.to_path_buf());
            match self.mode {
                Mode::Delegate => LiteralModuleLoader.load(path).await,
                Mode::Fail => Err(ModuleError::Evaluation {
                    path: path.to_path_buf(),
                    message: "boom".into(),
                }),
                Mode::Hang => std::future::pending().await,
            }
        }
    }

    /// Holds every load until `barrier` is full, so the calls overlap.
    #[derive(Debug)]
    struct GatheringLoader {
        seen: Mutex<Vec<PathBuf>>,
        barrier: Barrier,
    }

    #[async_trait]
    impl ModuleLoader for GatheringLoader {
        async fn load(&self, path: &Path) -> Result<ModuleBindings, ModuleError> {
            self.seen.lock().unwrap().push(path.to_path_buf());
            self.barrier.wait().await;
            assert!(path.exists());
            LiteralModuleLoader.load(path).await
        }
    }

    fn fallback(dir: &TempDir, compiler: FixedCompiler, loader: Arc<ProbeLoader>) -> CompileFallback {
        CompileFallback::new(Arc::new(compiler), loader, dir.path(), "mjs")
    }

    #[tokio::test]
    async fn test_loads_compiled_output_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let loader = ProbeLoader::new(Mode::Delegate);
        let fallback = fallback(
            &dir,
            FixedCompiler(Some("export default {\"a\": 1};")),
            loader.clone(),
        );

        let bindings = fallback
            .compile_and_load(Path::new("/src/config.ts"))
            .await
            .unwrap();

        assert_eq!(bindings.default_export(), Some(&json!({"a": 1})));
        let scratch = loader.seen();
        assert!(scratch
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(SCRATCH_PREFIX));
        assert_eq!(scratch.extension().unwrap(), "mjs");
        assert!(!scratch.exists());
    }

    #[tokio::test]
    async fn test_load_failure_propagates_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let loader = ProbeLoader::new(Mode::Fail);
        let fallback = fallback(&dir, FixedCompiler(Some("export default {};")), loader.clone());

        let err = fallback
            .compile_and_load(Path::new("/src/config.ts"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Module(ModuleError::Evaluation { .. })));
        assert!(!loader.seen().exists());
    }

    #[tokio::test]
    async fn test_no_output_is_transpile_failed() {
        let dir = TempDir::new().unwrap();
        let fallback = fallback(&dir, FixedCompiler(None), ProbeLoader::new(Mode::Delegate));

        let err = fallback
            .compile_and_load(Path::new("/src/config.ts"))
            .await
            .unwrap_err();

        assert_eq!(err.cause(), Some(crate::config::ErrorCause::TranspileFailed));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_abandoned_call_cleans_up() {
        let dir = TempDir::new().unwrap();
        let loader = ProbeLoader::new(Mode::Hang);
        let fallback = fallback(&dir, FixedCompiler(Some("export default {};")), loader.clone());

        let timed_out = tokio::time::timeout(
            Duration::from_millis(100),
            fallback.compile_and_load(Path::new("/src/config.ts")),
        )
        .await;

        assert!(timed_out.is_err());
        assert!(!loader.seen().exists());
    }

    #[tokio::test]
    async fn test_concurrent_calls_use_distinct_scratch_files() {
        let dir = TempDir::new().unwrap();
        let loader = Arc::new(GatheringLoader {
            seen: Mutex::new(Vec::new()),
            barrier: Barrier::new(2),
        });
        let fallback = CompileFallback::new(
            Arc::new(FixedCompiler(Some("export default {\"a\": 1};"))),
            loader.clone(),
            dir.path(),
            "mjs",
        );

        let (first, second) = tokio::join!(
            fallback.compile_and_load(Path::new("/src/one.ts")),
            fallback.compile_and_load(Path::new("/src/two.ts")),
        );

        assert_eq!(first.unwrap().default_export(), Some(&json!({"a": 1})));
        assert_eq!(second.unwrap().default_export(), Some(&json!({"a": 1})));
        let seen = loader.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_ne!(seen[0], seen[1]);
        assert!(seen.iter().all(|path| !path.exists()));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
