use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::schema::ValidationErrors;

/// Why a configuration could not be produced.
///
/// This is the closed set callers branch on; every [`ConfigError`] maps to
/// exactly one cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCause {
    FileNotFound,
    HaltAndCheck,
    NoExports,
    UncertainExport,
    InvalidDefaultConfigFormat,
    InvalidConfigFormat,
    InvalidPath,
    TranspileFailed,
}

impl ErrorCause {
    /// The snake_case tag of this cause.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCause::FileNotFound => "file_not_found",
            ErrorCause::HaltAndCheck => "halt_and_check",
            ErrorCause::NoExports => "no_exports",
            ErrorCause::UncertainExport => "uncertain_export",
            ErrorCause::InvalidDefaultConfigFormat => "invalid_default_config_format",
            ErrorCause::InvalidConfigFormat => "invalid_config_format",
            ErrorCause::InvalidPath => "invalid_path",
            ErrorCause::TranspileFailed => "transpile_failed",
        }
    }
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional detail for [`ErrorCause::FileNotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileNotFoundReason {
    /// Nothing exists at the path and no creation request was given.
    Missing,
    /// The path is relative and was rejected before touching the filesystem.
    NotAbsolute,
}

impl fmt::Display for FileNotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileNotFoundReason::Missing => f.write_str("missing"),
            FileNotFoundReason::NotAbsolute => f.write_str("not absolute"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found ({reason}): {path}")]
    FileNotFound {
        path: PathBuf,
        reason: FileNotFoundReason,
    },

    #[error("created config file '{0}'; review it before the next run")]
    HaltAndCheck(PathBuf),

    #[error("config module '{0}' has no usable export")]
    NoExports(PathBuf),

    #[error("config module '{path}' has several named exports ({}) and no default export", .names.join(", "))]
    UncertainExport { path: PathBuf, names: Vec<String> },

    #[error("default config does not match the schema:\n{0}")]
    InvalidDefaultConfigFormat(ValidationErrors),

    #[error("config loaded from '{path}' does not match the schema:\n{issues}")]
    InvalidConfigFormat {
        path: PathBuf,
        issues: ValidationErrors,
    },

    #[error("invalid config path '{path}': {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("compiling '{0}' produced no output")]
    TranspileFailed(PathBuf),
}

impl ConfigError {
    pub fn cause(&self) -> ErrorCause {
        match self {
            ConfigError::FileNotFound { .. } => ErrorCause::FileNotFound,
            ConfigError::HaltAndCheck(_) => ErrorCause::HaltAndCheck,
            ConfigError::NoExports(_) => ErrorCause::NoExports,
            ConfigError::UncertainExport { .. } => ErrorCause::UncertainExport,
            ConfigError::InvalidDefaultConfigFormat(_) => ErrorCause::InvalidDefaultConfigFormat,
            ConfigError::InvalidConfigFormat { .. } => ErrorCause::InvalidConfigFormat,
            ConfigError::InvalidPath { .. } => ErrorCause::InvalidPath,
            ConfigError::TranspileFailed(_) => ErrorCause::TranspileFailed,
        }
    }

    /// The reason sub-code, for [`ErrorCause::FileNotFound`] only.
    pub fn file_not_found_reason(&self) -> Option<FileNotFoundReason> {
        match self {
            ConfigError::FileNotFound { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cause_tags() {
        let err = ConfigError::FileNotFound {
            path: "cfg.ts".into(),
            reason: FileNotFoundReason::NotAbsolute,
        };
        assert_eq!(err.cause(), ErrorCause::FileNotFound);
        assert_eq!(err.cause().as_str(), "file_not_found");
        assert_eq!(err.file_not_found_reason(), Some(FileNotFoundReason::NotAbsolute));
        assert_eq!(
            err.to_string(),
            "config file not found (not absolute): cfg.ts"
        );

        let err = ConfigError::UncertainExport {
            path: "/a/cfg.ts".into(),
            names: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.cause(), ErrorCause::UncertainExport);
        assert!(err.to_string().contains("(a, b)"));
        assert_eq!(err.file_not_found_reason(), None);
    }
}
