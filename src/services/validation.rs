//! Required-field presence checks run before every write.

use serde::Serialize;
use thiserror::Error;

/// One or more required fields were absent from an inbound record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("missing required fields: {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

/// Collects missing fields while an inbound record is converted into an entity.
///
/// Every accessor hands back a usable value even when the field is missing, so
/// a record can be assembled in one pass; `finish` then reports every field
/// that was not supplied.
#[derive(Debug, Default)]
pub struct Validator {
    missing: Vec<&'static str>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required text: absent, null and blank strings all count as missing.
    pub fn text(&mut self, field: &'static str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    /// Required scalar. Only absence counts as missing; zero is a real value.
    pub fn required<T: Default>(&mut self, field: &'static str, value: Option<T>) -> T {
        match value {
            Some(v) => v,
            None => {
                self.missing.push(field);
                T::default()
            }
        }
    }

    /// Optional text, with blank strings normalised to `None`.
    pub fn optional_text(&mut self, value: Option<String>) -> Option<String> {
        value.filter(|v| !v.trim().is_empty())
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields: self.missing })
        }
    }
}
