//! Argument validation shared by the JSON-RPC and rmcp front ends.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// One failed constraint, addressed by argument name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Constraints beyond what the type system enforces.
pub trait Validate {
    fn validate(&self) -> Vec<Issue>;
}

/// Deserialize tool arguments and run [`Validate`]. A `null` argument object
/// is treated as `{}`.
pub fn parse_args<T>(args: serde_json::Value) -> Result<T, Vec<Issue>>
where
    T: DeserializeOwned + Validate,
{
    let args = if args.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        args
    };
    let parsed: T = serde_json::from_value(args).map_err(|e| vec![Issue::new("", e.to_string())])?;
    let issues = parsed.validate();
    if issues.is_empty() {
        Ok(parsed)
    } else {
        Err(issues)
    }
}

/// Human-readable form used where only a string error can be returned.
pub fn describe(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub(crate) fn non_empty(path: &str, value: &str, issues: &mut Vec<Issue>) {
    if value.is_empty() {
        issues.push(Issue::new(path, "must contain at least 1 character"));
    }
}
