//! Structured validation failures.
//!
//! Failures are keyed by field name; failures that concern the record as a
//! whole go under [`NON_FIELD_ERRORS`]. The map serializes directly into the
//! `errors` object of an API error body.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::ValidationErrorsKind;

/// Key under which record-level (cross-field) failures are reported.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field-keyed collection of validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection holding a single field failure.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add_field(field, message);
        errors
    }

    /// Build a collection holding a single record-level failure.
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add_non_field(message);
        errors
    }

    pub fn add_field(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.add_field(NON_FIELD_ERRORS, message);
    }

    /// Move every failure from `other` into `self`.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    /// Re-key every failure under `prefix` (`country` -> `address.country`).
    /// Record-level failures are reported against `prefix` itself.
    pub fn nested(self, prefix: &str) -> Self {
        let fields = self
            .fields
            .into_iter()
            .map(|(field, messages)| {
                let key = if field == NON_FIELD_ERRORS {
                    prefix.to_string()
                } else {
                    format!("{prefix}.{field}")
                };
                (key, messages)
            })
            .collect();
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for `field`, empty if none.
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field_messages(&self) -> &[String] {
        self.messages(NON_FIELD_ERRORS)
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                if field == NON_FIELD_ERRORS {
                    write!(f, "{message}")?;
                } else {
                    write!(f, "{field}: {message}")?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = Self::new();
        flatten_into(&mut errors, None, &source);
        errors
    }
}

/// Flatten nested `validator` output into dotted field names
/// (`address.country`).
fn flatten_into(
    out: &mut ValidationErrors,
    prefix: Option<&str>,
    source: &validator::ValidationErrors,
) {
    for (field, kind) in source.errors() {
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", error.code));
                    out.add_field(name.clone(), message);
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_into(out, Some(&name), inner),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_into(out, Some(&format!("{name}[{index}]")), inner);
                }
            }
        }
    }
}
