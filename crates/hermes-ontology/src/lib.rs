//! Hermes Ontology
//!
//! Domain model of the Hermes dialogue protocol:
//! - Session lifecycle messages (start, continue, end, queued, started, ended)
//! - Recognized and unrecognized intents, NLU slots and typed slot values
//! - ASR tokens, captured text and injection requests
//! - Dialogue configuration
//!
//! Every value is immutable once built. Optional fields are `Option<T>`,
//! never "empty string means absent".
//!
//! # Encodings
//!
//! The same model has two independent encodings:
//! 1. The flat, C-compatible layout (see the `hermes-ffi` crate)
//! 2. Canonical JSON text ([`json`])
//!
//! Both must agree on the semantics of every message kind.
//!
//! # Example
//!
//! ```
//! use hermes_ontology::{json, SessionQueuedMessage};
//!
//! let message = SessionQueuedMessage {
//!     session_id: "a session".into(),
//!     site_id: "kitchen".into(),
//!     custom_data: None,
//! };
//!
//! let text = json::to_json(&message).unwrap();
//! let back: SessionQueuedMessage = json::from_json(&text).unwrap();
//! assert_eq!(back, message);
//! ```

pub mod asr;
pub mod dialogue;
pub mod injection;
pub mod json;
pub mod nlu;
pub mod validate;

use thiserror::Error;

/// Ontology errors
#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("Invalid message: field '{field}' {reason}")]
    InvalidMessage { field: String, reason: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for ontology operations
pub type OntologyResult<T> = Result<T, OntologyError>;

/// A message kind that can cross the boundary in either encoding
pub trait HermesMessage:
    serde::Serialize
    + serde::de::DeserializeOwned
    + validate::Validate
    + std::fmt::Debug
    + Clone
    + PartialEq
{
    /// Stable kind name, used in diagnostics
    const KIND: &'static str;
}

// Re-export main types
pub use asr::{AsrDecodingDuration, AsrToken};
pub use dialogue::{
    ContinueSessionMessage, DialogueConfigureIntent, DialogueConfigureMessage,
    EndSessionMessage, IntentMessage, IntentNotRecognizedMessage, SessionEndedMessage,
    SessionInit, SessionQueuedMessage, SessionStartedMessage, SessionTerminationType,
    StartSessionMessage, TextCapturedMessage,
};
pub use injection::{InjectionKind, InjectionRequestMessage, MapStringToStringArray};
pub use nlu::{
    AmountOfMoneyValue, DurationValue, Grain, InstantTimeValue, NluIntentClassifierResult,
    NluSlot, NumberValue, OrdinalValue, PercentageValue, Precision, SlotValue, StringValue,
    TemperatureValue, TimeIntervalValue,
};
pub use validate::Validate;
