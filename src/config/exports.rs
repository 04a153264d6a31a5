use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::request::ConfigObject;
use super::ConfigError;
use crate::module::{ModuleBindings, DEFAULT_EXPORT};

/// Picks the configuration object out of a module's bindings.
///
/// An object-valued default export always wins. Otherwise the module must
/// have exactly one named export: none is `no_exports`, several are
/// `uncertain_export`. A lone named export that is not an object is not
/// usable either and counts as `no_exports`.
pub fn resolve_exports(path: &Path, bindings: ModuleBindings) -> Result<ConfigObject, ConfigError> {
    let default_is_object = matches!(bindings.default_export(), Some(Value::Object(_)));
    if default_is_object {
        debug!(path = %path.display(), "using default export");
        if let Some(Value::Object(config)) = bindings.take(DEFAULT_EXPORT) {
            return Ok(config);
        }
        return Err(ConfigError::NoExports(path.to_path_buf()));
    }

    let names: Vec<String> = bindings.named().map(|(name, _)| name.to_string()).collect();
    match names.as_slice() {
        [] => Err(ConfigError::NoExports(path.to_path_buf())),
        [name] => {
            debug!(path = %path.display(), export = %name, "using sole named export");
            match bindings.take(name) {
                Some(Value::Object(config)) => Ok(config),
                _ => Err(ConfigError::NoExports(path.to_path_buf())),
            }
        }
        _ => Err(ConfigError::UncertainExport {
            path: path.to_path_buf(),
            names,
        }),
    }
}
