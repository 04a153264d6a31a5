use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::module::{ModuleBindings, ModuleError, ModuleLoader};

/// Result of executing a config module directly.
#[derive(Debug)]
pub enum NativeOutcome {
    Loaded(ModuleBindings),
    /// The loader cannot interpret this kind of source; compiling it first
    /// may still work.
    Incapable(ModuleError),
    /// A real failure in the module, to be reported as is.
    Failed(ModuleError),
}

impl NativeOutcome {
    pub fn is_environment_incapable(&self) -> bool {
        matches!(self, NativeOutcome::Incapable(_))
    }
}

/// Executes config modules through the host's [`ModuleLoader`] and sorts
/// failures into "cannot interpret" and everything else.
#[derive(Debug, Clone)]
pub struct NativeLoader {
    loader: Arc<dyn ModuleLoader>,
}

impl NativeLoader {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self { loader }
    }

    pub async fn load(&self, path: &Path) -> NativeOutcome {
        match self.loader.load(path).await {
            Ok(bindings) => NativeOutcome::Loaded(bindings),
            Err(err) if err.is_unsupported() => {
                debug!(path = %path.display(), error = %err, "module cannot be executed directly");
                NativeOutcome::Incapable(err)
            }
            Err(err) => NativeOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::LiteralModuleLoader;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_classifies_failures() {
        let dir = TempDir::new().unwrap();
        let native = NativeLoader::new(Arc::new(LiteralModuleLoader));

        let typed = dir.path().join("config.ts");
        std::fs::write(&typed, "export const config = {};").unwrap();
        assert!(native.load(&typed).await.is_environment_incapable());

        let broken = dir.path().join("config.js");
        std::fs::write(&broken, "export const config = ;").unwrap();
        assert!(matches!(
            native.load(&broken).await,
            NativeOutcome::Failed(ModuleError::Syntax { .. })
        ));

        let good = dir.path().join("good.mjs");
        std::fs::write(&good, "export default {\"a\": 1};").unwrap();
        assert!(matches!(native.load(&good).await, NativeOutcome::Loaded(_)));
    }
}
