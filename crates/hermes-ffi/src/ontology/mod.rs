//! Flat, C-compatible mirrors of the Hermes ontology
//!
//! One `#[repr(C)]` struct per domain type:
//! - strings are owned nul-terminated buffers, null when optional and absent
//! - lists are `(entries, count)` pairs, see [`collections`]
//! - optional scalars and optional nested values are nullable boxed pointers
//! - polymorphic fields are a raw tag plus an untyped payload pointer
//!
//! Every type converts both ways through [`CReprOf`](crate::marshal::CReprOf)
//! and [`AsRust`](crate::marshal::AsRust), and its `Drop` releases exactly
//! what `c_repr_of` allocated.

pub mod asr;
pub mod collections;
pub mod dialogue;
pub mod injection;
pub mod nlu;

pub use asr::{CAsrDecodingDuration, CAsrToken, CAsrTokenArray, CAsrTokenDoubleArray};
pub use collections::{CArray, CMapStringToStringArray, CMapStringToStringArrayEntry, CStringArray};
pub use dialogue::{
    CActionSessionInit, CContinueSessionMessage, CDialogueConfigureIntent,
    CDialogueConfigureIntentArray, CDialogueConfigureMessage, CEndSessionMessage, CIntentMessage,
    CIntentNotRecognizedMessage, CSessionEndedMessage, CSessionInit, CSessionQueuedMessage,
    CSessionStartedMessage, CSessionTermination, CStartSessionMessage, CTextCapturedMessage,
    SessionInitType, SessionTerminationKind,
};
pub use injection::{
    CInjectionKind, CInjectionRequestMessage, CInjectionRequestOperation,
    CInjectionRequestOperations,
};
pub use nlu::{
    CAmountOfMoneyValue, CDurationValue, CGrain, CInstantTimeValue, CNluIntentClassifierResult,
    CNluSlot, CNluSlotArray, CPrecision, CSlotValue, CTemperatureValue, CTimeIntervalValue,
    SlotValueType,
};
