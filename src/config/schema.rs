//! Schema checks for configuration objects.
//!
//! A [`ConfigSchema`] reports every failing field, not just the first. JSON
//! Schema documents are supported through `jsonschema`. Each issue renders
//! as `<dotted.path>: <message>`, with `root` standing in for the top level:
//!
//! ```text
//! port: "8080" is not of type "number"
//! servers.0: "host" is a required property
//! ```

use std::fmt;

use jsonschema::Validator;
use serde_json::Value;

/// Validates a configuration value against a declared shape.
///
/// Implemented for [`jsonschema::Validator`]; hosts with another validation
/// library can implement it themselves.
pub trait ConfigSchema: Send + Sync {
    /// Returns every issue found, or `Ok` if `value` conforms.
    fn validate(&self, value: &Value) -> Result<(), ValidationErrors>;
}

impl ConfigSchema for Validator {
    fn validate(&self, value: &Value) -> Result<(), ValidationErrors> {
        let issues: Vec<Issue> = self
            .iter_errors(value)
            .map(|e| Issue::at_pointer(&e.instance_path.to_string(), e.to_string()))
            .collect();
        if issues.is_empty() {
            return Ok(());
        }
        Err(ValidationErrors::new(issues))
    }
}

/// Compiles a JSON Schema document.
///
/// ```
/// use modconf::config::schema_validator;
/// use serde_json::json;
///
/// let schema = schema_validator(&json!({
///     "type": "object",
///     "properties": {"port": {"type": "integer"}},
///     "required": ["port"]
/// }))
/// .unwrap();
/// ```
pub fn schema_validator(schema: &Value) -> Result<Validator, ValidationErrors> {
    jsonschema::validator_for(schema)
        .map_err(|e| Issue::root(format!("Invalid schema: {e}")).into())
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// An issue about the value as a whole.
    pub fn root(message: impl Into<String>) -> Self {
        Self::new(Vec::new(), message)
    }

    /// An issue located by a JSON pointer such as `/servers/0/host`.
    pub fn at_pointer(pointer: &str, message: impl Into<String>) -> Self {
        let path = pointer
            .split('/')
            .skip(1)
            .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
            .collect();
        Self::new(path, message)
    }

    /// Dotted field path, or `root` for the top level.
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            return "root".to_string();
        }
        self.path.join(".")
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path_string(), self.message)
    }
}

/// Every issue found while validating one value, rendered one per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<Issue>,
}

impl ValidationErrors {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl From<Issue> for ValidationErrors {
    fn from(issue: Issue) -> Self {
        Self::new(vec![issue])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
