//! Field-level violation type, conversion from `validator` errors, and a
//! lenient field-by-field reader for JSON request bodies.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_path_to_error::{Path, Segment};
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;

/// A single field-level violation: the JSON path of the offending field
/// and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Reads a JSON object one field at a time.
///
/// A missing or mistyped field becomes a violation at its own path and
/// reading carries on, so one bad field never hides the others.
#[derive(Debug)]
pub struct FieldReader {
    fields: Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl FieldReader {
    pub fn new(body: Value) -> Result<Self, CoreError> {
        match body {
            Value::Object(fields) => Ok(Self {
                fields,
                violations: Vec::new(),
            }),
            _ => Err(CoreError::InvalidFields(vec![FieldViolation::new(
                "",
                "Request body must be a JSON object",
            )])),
        }
    }

    /// Absent and `null` both read as `None`.
    pub fn optional<T: DeserializeOwned>(&mut self, field: &str) -> Option<T> {
        let value = self.fields.remove(field).filter(|v| !v.is_null())?;
        match serde_path_to_error::deserialize::<_, T>(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                let path = nested_path(field, e.path());
                self.reject(path, e.into_inner().to_string());
                None
            }
        }
    }

    /// Like [`optional`](Self::optional), but absence is reported with `message`.
    pub fn required<T: DeserializeOwned>(&mut self, field: &str, message: &str) -> Option<T> {
        if self.fields.get(field).map_or(true, Value::is_null) {
            self.reject(field, message);
            return None;
        }
        self.optional(field)
    }

    /// Record a failed domain check against `field`.
    pub fn check(&mut self, field: &str, result: Result<(), CoreError>) {
        if let Err(e) = result {
            let message = match e {
                CoreError::Validation(msg) => msg,
                other => other.to_string(),
            };
            self.reject(field, message);
        }
    }

    pub fn reject(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    /// Whether `field` or anything nested under it was already rejected.
    pub fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| {
            v.field == field
                || v.field
                    .strip_prefix(field)
                    .is_some_and(|rest| rest.starts_with('[') || rest.starts_with('.'))
        })
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }

    /// `Ok` when nothing was rejected, else every violation in reading order.
    pub fn finish(self) -> Result<(), CoreError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(self.violations))
        }
    }
}

/// `field` followed by the path inside its value, e.g. `preferences[1]`.
fn nested_path(field: &str, path: &Path) -> String {
    let mut out = field.to_string();
    for segment in path.iter() {
        match segment {
            Segment::Seq { index } => out.push_str(&format!("[{index}]")),
            Segment::Map { key } | Segment::Enum { variant: key } => {
                out.push('.');
                out.push_str(key);
            }
            Segment::Unknown => out.push_str(".?"),
        }
    }
    out
}

/// Flatten `validator` errors into violations keyed by camelCase JSON path.
///
/// Output is sorted by field path so responses are stable across runs.
pub fn violations_from(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, &to_camel_case(&field.to_string()));
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    out.push(FieldViolation::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// `travel_month` -> `travelMonth`. Already camelCase input is unchanged.
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
