//! Vocabulary injection requests

use crate::validate::{optional_text, Validate};
use crate::{HermesMessage, OntologyResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entity name to its values. Ordered so the JSON encoding is canonical.
pub type MapStringToStringArray = BTreeMap<String, Vec<String>>;

impl HermesMessage for MapStringToStringArray {
    const KIND: &'static str = "map_string_to_string_array";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InjectionKind {
    /// Add the values to the current vocabulary
    Add,
    /// Add the values to the vocabulary shipped with the assistant
    AddFromVanilla,
}

/// Request to inject new entity values into the ASR and NLU
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionRequestMessage {
    /// Applied in order
    pub operations: Vec<(InjectionKind, MapStringToStringArray)>,
    /// Word to pronunciations
    #[serde(default)]
    pub lexicon: MapStringToStringArray,
    /// Language used to guess pronunciations of foreign words
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Validate for InjectionRequestMessage {
    fn validate(&self) -> OntologyResult<()> {
        for (_, values) in &self.operations {
            values.validate()?;
        }
        self.lexicon.validate()?;
        optional_text("cross_language", self.cross_language.as_ref())?;
        optional_text("id", self.id.as_ref())
    }
}

impl HermesMessage for InjectionRequestMessage {
    const KIND: &'static str = "injection_request";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_are_validated() {
        let mut values = MapStringToStringArray::new();
        values.insert("films".into(), vec!["bad\0value".into()]);
        let message = InjectionRequestMessage {
            operations: vec![(InjectionKind::Add, values)],
            lexicon: MapStringToStringArray::new(),
            cross_language: None,
            id: None,
        };
        assert!(message.validate().is_err());
    }
}
