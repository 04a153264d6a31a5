//! Rendering and persisting new config files.

use std::io::Write;
use std::path::{Component, Path};

use oxc::syntax::identifier::is_identifier_name;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use super::request::{CreationRequest, TypeSource};
use super::schema::{Issue, ValidationErrors};
use super::ConfigError;
use crate::Error;

/// Name of the constant a generated config file exports.
pub const CONFIG_IDENTIFIER: &str = "config";

/// Comment placed above the generated config.
pub const REVIEW_BANNER: &str =
    "// Please review and adjust these settings as needed for your project.";

/// Writes new config files from a [`CreationRequest`].
///
/// A generated file looks like:
///
/// ```text
/// import type {AppConfig} from "./types.ts";
///
/// // Please review and adjust these settings as needed for your project.
///
/// export const config:AppConfig = {
///     "port": 8080
/// };
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigFileWriter;

impl ConfigFileWriter {
    pub fn new() -> Self {
        Self
    }

    /// Renders the source text for a new config file at `path`.
    pub fn render(&self, path: &Path, request: &CreationRequest) -> Result<String, ConfigError> {
        check_target(path)?;

        let literal = pretty_literal(request)?;
        let mut out = String::new();

        let annotation = match &request.type_constraint {
            Some(constraint) => {
                if constraint.identifier.is_empty() || !is_identifier_name(&constraint.identifier) {
                    return Err(ConfigError::invalid_path(
                        path,
                        format!("type name '{}' is not an identifier", constraint.identifier),
                    ));
                }
                let specifier = match &constraint.source {
                    TypeSource::Package { package_name } => package_name.clone(),
                    TypeSource::Local { absolute_path } => {
                        if !absolute_path.is_absolute() {
                            return Err(ConfigError::invalid_path(
                                absolute_path,
                                "type declaration path is not absolute",
                            ));
                        }
                        relative_import(path, absolute_path)
                    }
                };
                out.push_str(&format!(
                    "import type {{{}}} from {};\n\n",
                    constraint.identifier,
                    quote(&specifier)
                ));
                format!(":{}", constraint.identifier)
            }
            None => String::new(),
        };

        out.push_str(REVIEW_BANNER);
        out.push_str("\n\n");
        out.push_str(&format!(
            "export const {CONFIG_IDENTIFIER}{annotation} = {literal};\n"
        ));
        Ok(out)
    }

    /// Renders and atomically writes a new config file at `path`, creating
    /// missing parent directories.
    pub async fn write(&self, path: &Path, request: &CreationRequest) -> Result<(), Error> {
        let source = self.render(path, request)?;
        let target = path.to_path_buf();

        let result = tokio::task::spawn_blocking(move || persist(&target, &source))
            .await
            .map_err(std::io::Error::other)
            .and_then(|result| result);

        result.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "created config file");
        Ok(())
    }
}

/// Rejects relative paths and paths that look like directories.
fn check_target(path: &Path) -> Result<(), ConfigError> {
    if !path.is_absolute() {
        return Err(ConfigError::invalid_path(path, "path is not absolute"));
    }
    if path.extension().is_none() {
        return Err(ConfigError::invalid_path(
            path,
            "path has no file extension and looks like a directory",
        ));
    }
    Ok(())
}

fn pretty_literal(request: &CreationRequest) -> Result<String, ConfigError> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    request
        .default_config
        .serialize(&mut serializer)
        .map_err(|e| {
            ConfigError::InvalidDefaultConfigFormat(ValidationErrors::from(Issue::root(
                e.to_string(),
            )))
        })?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn quote(specifier: &str) -> String {
    serde_json::to_string(specifier).unwrap_or_else(|_| format!("\"{specifier}\""))
}

fn persist(path: &Path, source: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("/"));
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(source.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Import specifier for `target` as seen from the directory containing
/// `from_file`. Always starts with `./` or `../` and uses `/` separators.
pub fn relative_import(from_file: &Path, target: &Path) -> String {
    let from_dir = from_file.parent().unwrap_or(from_file);
    let from = normalize(from_dir);
    let to = normalize(target);

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = std::iter::repeat("..".to_string())
        .take(from.len() - common)
        .collect();
    parts.extend(to[common..].iter().cloned());

    let joined = parts.join("/");
    if joined.starts_with("./") || joined.starts_with("../") {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Lexically resolves `.` and `..`, returning the remaining components.
fn normalize(path: &Path) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::RootDir => out.push(String::from("/")),
            Component::Prefix(prefix) => {
                out.push(prefix.as_os_str().to_string_lossy().into_owned())
            }
            Component::Normal(part) => out.push(part.to_string_lossy().into_owned()),
        }
    }
    out
}
