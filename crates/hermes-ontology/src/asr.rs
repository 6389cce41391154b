//! Speech recognition tokens

use crate::validate::{finite, text, Validate};
use crate::{HermesMessage, OntologyResult};
use serde::{Deserialize, Serialize};

/// Time span of a decoded token, in seconds from the start of the capture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsrDecodingDuration {
    pub start: f32,
    pub end: f32,
}

/// A single token produced by one ASR pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsrToken {
    /// Decoded text of the token
    pub value: String,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// Start offset of the token in the decoded input
    pub range_start: usize,
    /// End offset of the token in the decoded input
    pub range_end: usize,
    pub time: AsrDecodingDuration,
}

impl Validate for AsrToken {
    fn validate(&self) -> OntologyResult<()> {
        text("value", &self.value)?;
        finite("confidence", self.confidence)?;
        finite("time.start", self.time.start)?;
        finite("time.end", self.time.end)
    }
}

impl HermesMessage for AsrToken {
    const KIND: &'static str = "asr_token";
}

impl HermesMessage for Vec<AsrToken> {
    const KIND: &'static str = "asr_token_array";
}

impl HermesMessage for Vec<Vec<AsrToken>> {
    const KIND: &'static str = "asr_token_double_array";
}
