//! Dialogue messages: session lifecycle, intents and configuration

use crate::asr::AsrToken;
use crate::nlu::{NluIntentClassifierResult, NluSlot};
use crate::validate::{
    finite, identifier, optional_finite, optional_text, optional_texts, text, Validate,
};
use crate::{HermesMessage, OntologyResult};
use serde::{Deserialize, Serialize};

/// How a session is opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionInit {
    /// The session expects an answer from the user
    #[serde(rename_all = "camelCase")]
    Action {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Restricts the intents that may be recognized; `Some(vec![])` is an
        /// explicit empty filter, distinct from no filter at all
        #[serde(default, skip_serializing_if = "Option::is_none")]
        intent_filter: Option<Vec<String>>,
        can_be_enqueued: bool,
        #[serde(default)]
        send_intent_not_recognized: bool,
    },
    /// The session only says something and ends
    Notification { text: String },
}

impl Validate for SessionInit {
    fn validate(&self) -> OntologyResult<()> {
        match self {
            SessionInit::Action {
                text, intent_filter, ..
            } => {
                optional_text("init.text", text.as_ref())?;
                optional_texts("init.intent_filter", intent_filter.as_ref())
            }
            SessionInit::Notification { text: value } => text("init.text", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionMessage {
    pub init: SessionInit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
    /// Absent means the default site
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
}

impl Validate for StartSessionMessage {
    fn validate(&self) -> OntologyResult<()> {
        self.init.validate()?;
        optional_text("custom_data", self.custom_data.as_ref())?;
        if let Some(site_id) = &self.site_id {
            identifier("site_id", site_id)?;
        }
        Ok(())
    }
}

impl HermesMessage for StartSessionMessage {
    const KIND: &'static str = "start_session";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueSessionMessage {
    pub session_id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_filter: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
    /// Slot the next user answer should fill
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default)]
    pub send_intent_not_recognized: bool,
}

impl Validate for ContinueSessionMessage {
    fn validate(&self) -> OntologyResult<()> {
        identifier("session_id", &self.session_id)?;
        text("text", &self.text)?;
        optional_texts("intent_filter", self.intent_filter.as_ref())?;
        optional_text("custom_data", self.custom_data.as_ref())?;
        optional_text("slot", self.slot.as_ref())
    }
}

impl HermesMessage for ContinueSessionMessage {
    const KIND: &'static str = "continue_session";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionMessage {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Validate for EndSessionMessage {
    fn validate(&self) -> OntologyResult<()> {
        identifier("session_id", &self.session_id)?;
        optional_text("text", self.text.as_ref())
    }
}

impl HermesMessage for EndSessionMessage {
    const KIND: &'static str = "end_session";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQueuedMessage {
    pub session_id: String,
    pub site_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
}

impl Validate for SessionQueuedMessage {
    fn validate(&self) -> OntologyResult<()> {
        identifier("session_id", &self.session_id)?;
        identifier("site_id", &self.site_id)?;
        optional_text("custom_data", self.custom_data.as_ref())
    }
}

impl HermesMessage for SessionQueuedMessage {
    const KIND: &'static str = "session_queued";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartedMessage {
    pub session_id: String,
    pub site_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactivated_from_session_id: Option<String>,
}

impl Validate for SessionStartedMessage {
    fn validate(&self) -> OntologyResult<()> {
        identifier("session_id", &self.session_id)?;
        identifier("site_id", &self.site_id)?;
        optional_text("custom_data", self.custom_data.as_ref())?;
        optional_text(
            "reactivated_from_session_id",
            self.reactivated_from_session_id.as_ref(),
        )
    }
}

impl HermesMessage for SessionStartedMessage {
    const KIND: &'static str = "session_started";
}

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum SessionTerminationType {
    Nominal,
    SiteUnavailable,
    AbortedByUser,
    IntentNotRecognized,
    Timeout,
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedMessage {
    pub session_id: String,
    pub site_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
    pub termination: SessionTerminationType,
}

impl Validate for SessionEndedMessage {
    fn validate(&self) -> OntologyResult<()> {
        identifier("session_id", &self.session_id)?;
        identifier("site_id", &self.site_id)?;
        optional_text("custom_data", self.custom_data.as_ref())?;
        match &self.termination {
            SessionTerminationType::Error { error } => text("termination.error", error),
            _ => Ok(()),
        }
    }
}

impl HermesMessage for SessionEndedMessage {
    const KIND: &'static str = "session_ended";
}

/// A recognized intent with its slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentMessage {
    pub session_id: String,
    pub site_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
    pub input: String,
    pub intent: NluIntentClassifierResult,
    pub slots: Vec<NluSlot>,
    /// One token list per ASR invocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asr_tokens: Option<Vec<Vec<AsrToken>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asr_confidence: Option<f32>,
}

impl Validate for IntentMessage {
    fn validate(&self) -> OntologyResult<()> {
        identifier("session_id", &self.session_id)?;
        identifier("site_id", &self.site_id)?;
        optional_text("custom_data", self.custom_data.as_ref())?;
        text("input", &self.input)?;
        self.intent.validate()?;
        self.slots.validate()?;
        if let Some(asr_tokens) = &self.asr_tokens {
            asr_tokens.validate()?;
        }
        optional_finite("asr_confidence", self.asr_confidence)
    }
}

impl HermesMessage for IntentMessage {
    const KIND: &'static str = "intent";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentNotRecognizedMessage {
    pub session_id: String,
    pub site_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
    pub confidence_score: f32,
}

impl Validate for IntentNotRecognizedMessage {
    fn validate(&self) -> OntologyResult<()> {
        identifier("session_id", &self.session_id)?;
        identifier("site_id", &self.site_id)?;
        optional_text("input", self.input.as_ref())?;
        optional_text("custom_data", self.custom_data.as_ref())?;
        finite("confidence_score", self.confidence_score)
    }
}

impl HermesMessage for IntentNotRecognizedMessage {
    const KIND: &'static str = "intent_not_recognized";
}

/// Text captured by the ASR during a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCapturedMessage {
    pub text: String,
    pub likelihood: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<AsrToken>>,
    /// Duration of the captured audio
    pub seconds: f32,
    pub site_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl Validate for TextCapturedMessage {
    fn validate(&self) -> OntologyResult<()> {
        text("text", &self.text)?;
        finite("likelihood", self.likelihood)?;
        finite("seconds", self.seconds)?;
        if let Some(tokens) = &self.tokens {
            tokens.validate()?;
        }
        identifier("site_id", &self.site_id)?;
        if let Some(session_id) = &self.session_id {
            identifier("session_id", session_id)?;
        }
        Ok(())
    }
}

impl HermesMessage for TextCapturedMessage {
    const KIND: &'static str = "text_captured";
}

/// Enables or disables one intent; `enable: None` leaves it unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueConfigureIntent {
    pub intent_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
}

impl Validate for DialogueConfigureIntent {
    fn validate(&self) -> OntologyResult<()> {
        text("intent_id", &self.intent_id)
    }
}

impl HermesMessage for DialogueConfigureIntent {
    const KIND: &'static str = "dialogue_configure_intent";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueConfigureMessage {
    /// Absent means every site
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intents: Option<Vec<DialogueConfigureIntent>>,
}

impl Validate for DialogueConfigureMessage {
    fn validate(&self) -> OntologyResult<()> {
        if let Some(site_id) = &self.site_id {
            identifier("site_id", site_id)?;
        }
        if let Some(intents) = &self.intents {
            intents.validate()?;
        }
        Ok(())
    }
}

impl HermesMessage for DialogueConfigureMessage {
    const KIND: &'static str = "dialogue_configure";
}
