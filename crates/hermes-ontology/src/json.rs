//! Canonical JSON encoding
//!
//! One static mapping per message kind, derived from the serde attributes on
//! the domain types:
//! - camelCase field names
//! - absent optionals omitted on write, read back as absent
//! - maps written in key order
//!
//! Encoding validates first, so an invalid message never becomes text.

use crate::validate::Validate;
use crate::OntologyResult;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Validate and serialize a domain value to canonical JSON
pub fn to_json<T>(value: &T) -> OntologyResult<String>
where
    T: Serialize + Validate,
{
    value.validate()?;
    Ok(serde_json::to_string(value)?)
}

/// Deserialize a domain value from JSON text
pub fn from_json<T>(text: &str) -> OntologyResult<T>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(text)?)
}
