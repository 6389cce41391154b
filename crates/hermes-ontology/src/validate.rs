//! Message validation
//!
//! A domain value must satisfy its invariants before it is converted to any
//! foreign representation. Violations are reported as
//! [`OntologyError::InvalidMessage`] and never cross the boundary.
//!
//! Rules:
//! - identifiers the schema requires (session id, site id) are non-empty
//! - no string contains an interior NUL byte
//! - every float is finite

use crate::{OntologyError, OntologyResult};
use std::collections::BTreeMap;

/// Invariant check run before a value leaves the domain model
pub trait Validate {
    /// Check every invariant of this value and its nested records
    fn validate(&self) -> OntologyResult<()>;
}

fn invalid(field: &str, reason: &str) -> OntologyError {
    OntologyError::InvalidMessage {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// A required identifier: non-empty and nul-free
pub(crate) fn identifier(field: &str, value: &str) -> OntologyResult<()> {
    if value.is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    text(field, value)
}

/// Any string that will become a nul-terminated buffer
pub(crate) fn text(field: &str, value: &str) -> OntologyResult<()> {
    if value.as_bytes().contains(&0) {
        return Err(invalid(field, "contains an interior NUL byte"));
    }
    Ok(())
}

/// A float that must survive both encodings unchanged
pub(crate) fn finite(field: &str, value: impl Into<f64>) -> OntologyResult<()> {
    if value.into().is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be a finite number"))
    }
}

pub(crate) fn optional_finite(field: &str, value: Option<f32>) -> OntologyResult<()> {
    match value {
        Some(value) => finite(field, value),
        None => Ok(()),
    }
}

pub(crate) fn optional_text(field: &str, value: Option<&String>) -> OntologyResult<()> {
    match value {
        Some(value) => text(field, value),
        None => Ok(()),
    }
}

pub(crate) fn texts(field: &str, values: &[String]) -> OntologyResult<()> {
    values.iter().try_for_each(|value| text(field, value))
}

pub(crate) fn optional_texts(field: &str, values: Option<&Vec<String>>) -> OntologyResult<()> {
    match values {
        Some(values) => texts(field, values),
        None => Ok(()),
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> OntologyResult<()> {
        self.iter().try_for_each(Validate::validate)
    }
}

impl Validate for BTreeMap<String, Vec<String>> {
    fn validate(&self) -> OntologyResult<()> {
        for (key, values) in self {
            text("key", key)?;
            texts(key, values)?;
        }
        Ok(())
    }
}
