use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use super::schema::{kind_of, Issue, ValidationErrors};
use super::ConfigError;

/// A plain configuration object.
pub type ConfigObject = Map<String, Value>;

/// Where the type named by a [`TypeConstraint`] is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSource {
    /// Imported from a package by name.
    Package { package_name: String },
    /// Imported from a declaration file on disk.
    Local { absolute_path: PathBuf },
}

/// The named type a generated config constant is annotated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeConstraint {
    pub identifier: String,
    pub source: TypeSource,
}

impl TypeConstraint {
    pub fn package(identifier: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            source: TypeSource::Package {
                package_name: package_name.into(),
            },
        }
    }

    pub fn local(identifier: impl Into<String>, absolute_path: impl AsRef<Path>) -> Self {
        Self {
            identifier: identifier.into(),
            source: TypeSource::Local {
                absolute_path: absolute_path.as_ref().to_path_buf(),
            },
        }
    }
}

/// What to do when the requested config file does not exist yet.
///
/// The default config is written to disk. With
/// [`immediately_use`](Self::immediately_use) it is also returned as the
/// result; otherwise resolution stops with
/// [`ErrorCause::HaltAndCheck`](super::ErrorCause::HaltAndCheck) so the new
/// file can be reviewed first.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct CreationRequest {
    pub default_config: ConfigObject,
    pub immediately_use: bool,
    pub type_constraint: Option<TypeConstraint>,
}

impl CreationRequest {
    pub fn new(default_config: ConfigObject) -> Self {
        Self {
            default_config,
            immediately_use: false,
            type_constraint: None,
        }
    }

    /// Builds a request from any serializable default.
    ///
    /// Fails with `invalid_default_config_format` if `default_config` does not
    /// serialize to an object.
    pub fn from_serialize<T: Serialize>(default_config: &T) -> Result<Self, ConfigError> {
        let invalid = |message: String| {
            ConfigError::InvalidDefaultConfigFormat(ValidationErrors::from(Issue::root(message)))
        };

        match serde_json::to_value(default_config) {
            Ok(Value::Object(object)) => Ok(Self::new(object)),
            Ok(other) => Err(invalid(format!(
                "Expected object, received {}",
                kind_of(&other)
            ))),
            Err(e) => Err(invalid(e.to_string())),
        }
    }

    /// Return the default right away instead of halting for review.
    pub fn immediately_use(mut self, immediately_use: bool) -> Self {
        self.immediately_use = immediately_use;
        self
    }

    pub fn with_type(mut self, constraint: TypeConstraint) -> Self {
        self.type_constraint = Some(constraint);
        self
    }
}
