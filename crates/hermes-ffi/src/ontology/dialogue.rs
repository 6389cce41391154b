use super::asr::{CAsrTokenArray, CAsrTokenDoubleArray};
use super::collections::{CArray, CStringArray};
use super::nlu::{CNluIntentClassifierResult, CNluSlotArray};
use crate::error::{FfiError, FfiResult};
use crate::marshal::{
    bool_from_c, bool_to_c, c_string, optional_as_rust, optional_c_string,
    optional_c_string_into_raw, optional_into_raw, optional_rust_string_from,
    optional_scalar_into_raw, raw_borrow, read_optional_scalar, rust_string_from,
    take_back_c_string, take_back_optional, take_back_scalar, AsRust, CReprOf,
    RawPointerConverter,
};
use hermes_ontology::{
    ContinueSessionMessage, DialogueConfigureIntent, DialogueConfigureMessage, EndSessionMessage,
    IntentMessage, IntentNotRecognizedMessage, SessionEndedMessage, SessionInit,
    SessionQueuedMessage, SessionStartedMessage, SessionTerminationType, StartSessionMessage,
    TextCapturedMessage, Validate,
};
use std::os::raw::{c_char, c_float, c_int, c_uchar, c_void};
use std::ptr;

// ===== Session init =====

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInitType {
    Action = 1,
    Notification = 2,
}

impl SessionInitType {
    pub fn of(init: &SessionInit) -> Self {
        match init {
            SessionInit::Action { .. } => SessionInitType::Action,
            SessionInit::Notification { .. } => SessionInitType::Notification,
        }
    }

    pub fn try_from_raw(raw: c_int) -> FfiResult<Self> {
        match raw {
            1 => Ok(SessionInitType::Action),
            2 => Ok(SessionInitType::Notification),
            other => Err(FfiError::malformed(format!("unknown session init type {}", other))),
        }
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CActionSessionInit {
    /// Nullable
    pub text: *const c_char,
    /// Nullable
    pub intent_filter: *const CStringArray,
    pub can_be_enqueued: c_uchar,
    pub send_intent_not_recognized: c_uchar,
}

impl AsRust<SessionInit> for CActionSessionInit {
    fn as_rust(&self) -> FfiResult<SessionInit> {
        Ok(SessionInit::Action {
            text: unsafe { optional_rust_string_from(self.text, "init.text") }?,
            intent_filter: unsafe { optional_as_rust(self.intent_filter) }?,
            can_be_enqueued: bool_from_c(self.can_be_enqueued, "init.can_be_enqueued")?,
            send_intent_not_recognized: bool_from_c(
                self.send_intent_not_recognized,
                "init.send_intent_not_recognized",
            )?,
        })
    }
}

impl Drop for CActionSessionInit {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.text);
            take_back_optional(self.intent_filter);
        }
    }
}

/// `value` points to a [`CActionSessionInit`] or to the notification text
#[repr(C)]
#[derive(Debug)]
pub struct CSessionInit {
    /// One of [`SessionInitType`]
    pub init_type: c_int,
    pub value: *const c_void,
}

impl CReprOf<SessionInit> for CSessionInit {
    fn c_repr_of(input: SessionInit) -> FfiResult<Self> {
        let init_type = SessionInitType::of(&input) as c_int;
        let value = match input {
            SessionInit::Action {
                text,
                intent_filter,
                can_be_enqueued,
                send_intent_not_recognized,
            } => {
                let text = optional_c_string("init.text", text)?;
                let intent_filter = intent_filter.map(CStringArray::c_repr_of).transpose()?;
                CActionSessionInit {
                    text: optional_c_string_into_raw(text),
                    intent_filter: optional_into_raw(intent_filter),
                    can_be_enqueued: bool_to_c(can_be_enqueued),
                    send_intent_not_recognized: bool_to_c(send_intent_not_recognized),
                }
                .into_raw_pointer() as *const c_void
            }
            SessionInit::Notification { text } => {
                c_string("init.text", text)?.into_raw() as *const c_void
            }
        };
        Ok(Self { init_type, value })
    }
}

impl AsRust<SessionInit> for CSessionInit {
    fn as_rust(&self) -> FfiResult<SessionInit> {
        match SessionInitType::try_from_raw(self.init_type)? {
            SessionInitType::Action => {
                unsafe { raw_borrow(self.value as *const CActionSessionInit, "init.value") }?
                    .as_rust()
            }
            SessionInitType::Notification => Ok(SessionInit::Notification {
                text: unsafe { rust_string_from(self.value as *const c_char, "init.text") }?,
            }),
        }
    }
}

impl Drop for CSessionInit {
    fn drop(&mut self) {
        match SessionInitType::try_from_raw(self.init_type) {
            Ok(SessionInitType::Action) => unsafe {
                take_back_optional(self.value as *const CActionSessionInit);
            },
            Ok(SessionInitType::Notification) => unsafe {
                take_back_c_string(self.value as *const c_char);
            },
            Err(_) => {}
        }
    }
}

// ===== Session requests =====

#[repr(C)]
#[derive(Debug)]
pub struct CStartSessionMessage {
    pub init: CSessionInit,
    /// Nullable
    pub custom_data: *const c_char,
    /// Nullable
    pub site_id: *const c_char,
}

impl CReprOf<StartSessionMessage> for CStartSessionMessage {
    fn c_repr_of(input: StartSessionMessage) -> FfiResult<Self> {
        input.validate()?;
        let custom_data = optional_c_string("custom_data", input.custom_data)?;
        let site_id = optional_c_string("site_id", input.site_id)?;
        let init = CSessionInit::c_repr_of(input.init)?;
        Ok(Self {
            init,
            custom_data: optional_c_string_into_raw(custom_data),
            site_id: optional_c_string_into_raw(site_id),
        })
    }
}

impl AsRust<StartSessionMessage> for CStartSessionMessage {
    fn as_rust(&self) -> FfiResult<StartSessionMessage> {
        Ok(StartSessionMessage {
            init: self.init.as_rust()?,
            custom_data: unsafe { optional_rust_string_from(self.custom_data, "custom_data") }?,
            site_id: unsafe { optional_rust_string_from(self.site_id, "site_id") }?,
        })
    }
}

impl Drop for CStartSessionMessage {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.custom_data);
            take_back_c_string(self.site_id);
        }
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CContinueSessionMessage {
    pub session_id: *const c_char,
    pub text: *const c_char,
    /// Nullable
    pub intent_filter: *const CStringArray,
    /// Nullable
    pub custom_data: *const c_char,
    /// Nullable
    pub slot: *const c_char,
    pub send_intent_not_recognized: c_uchar,
}

impl CReprOf<ContinueSessionMessage> for CContinueSessionMessage {
    fn c_repr_of(input: ContinueSessionMessage) -> FfiResult<Self> {
        input.validate()?;
        let session_id = c_string("session_id", input.session_id)?;
        let text = c_string("text", input.text)?;
        let custom_data = optional_c_string("custom_data", input.custom_data)?;
        let slot = optional_c_string("slot", input.slot)?;
        let intent_filter = input
            .intent_filter
            .map(CStringArray::c_repr_of)
            .transpose()?;
        Ok(Self {
            session_id: session_id.into_raw(),
            text: text.into_raw(),
            intent_filter: optional_into_raw(intent_filter),
            custom_data: optional_c_string_into_raw(custom_data),
            slot: optional_c_string_into_raw(slot),
            send_intent_not_recognized: bool_to_c(input.send_intent_not_recognized),
        })
    }
}

impl AsRust<ContinueSessionMessage> for CContinueSessionMessage {
    fn as_rust(&self) -> FfiResult<ContinueSessionMessage> {
        unsafe {
            Ok(ContinueSessionMessage {
                session_id: rust_string_from(self.session_id, "session_id")?,
                text: rust_string_from(self.text, "text")?,
                intent_filter: optional_as_rust(self.intent_filter)?,
                custom_data: optional_rust_string_from(self.custom_data, "custom_data")?,
                slot: optional_rust_string_from(self.slot, "slot")?,
                send_intent_not_recognized: bool_from_c(
                    self.send_intent_not_recognized,
                    "send_intent_not_recognized",
                )?,
            })
        }
    }
}

impl Drop for CContinueSessionMessage {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.session_id);
            take_back_c_string(self.text);
            take_back_optional(self.intent_filter);
            take_back_c_string(self.custom_data);
            take_back_c_string(self.slot);
        }
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CEndSessionMessage {
    pub session_id: *const c_char,
    /// Nullable
    pub text: *const c_char,
}

impl CReprOf<EndSessionMessage> for CEndSessionMessage {
    fn c_repr_of(input: EndSessionMessage) -> FfiResult<Self> {
        input.validate()?;
        let session_id = c_string("session_id", input.session_id)?;
        let text = optional_c_string("text", input.text)?;
        Ok(Self {
            session_id: session_id.into_raw(),
            text: optional_c_string_into_raw(text),
        })
    }
}

impl AsRust<EndSessionMessage> for CEndSessionMessage {
    fn as_rust(&self) -> FfiResult<EndSessionMessage> {
        Ok(EndSessionMessage {
            session_id: unsafe { rust_string_from(self.session_id, "session_id") }?,
            text: unsafe { optional_rust_string_from(self.text, "text") }?,
        })
    }
}

impl Drop for CEndSessionMessage {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.session_id);
            take_back_c_string(self.text);
        }
    }
}

// ===== Session notifications =====

#[repr(C)]
#[derive(Debug)]
pub struct CSessionQueuedMessage {
    pub session_id: *const c_char,
    /// Nullable
    pub custom_data: *const c_char,
    pub site_id: *const c_char,
}

impl CReprOf<SessionQueuedMessage> for CSessionQueuedMessage {
    fn c_repr_of(input: SessionQueuedMessage) -> FfiResult<Self> {
        input.validate()?;
        let session_id = c_string("session_id", input.session_id)?;
        let custom_data = optional_c_string("custom_data", input.custom_data)?;
        let site_id = c_string("site_id", input.site_id)?;
        Ok(Self {
            session_id: session_id.into_raw(),
            custom_data: optional_c_string_into_raw(custom_data),
            site_id: site_id.into_raw(),
        })
    }
}

impl AsRust<SessionQueuedMessage> for CSessionQueuedMessage {
    fn as_rust(&self) -> FfiResult<SessionQueuedMessage> {
        unsafe {
            Ok(SessionQueuedMessage {
                session_id: rust_string_from(self.session_id, "session_id")?,
                site_id: rust_string_from(self.site_id, "site_id")?,
                custom_data: optional_rust_string_from(self.custom_data, "custom_data")?,
            })
        }
    }
}

impl Drop for CSessionQueuedMessage {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.session_id);
            take_back_c_string(self.custom_data);
            take_back_c_string(self.site_id);
        }
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CSessionStartedMessage {
    pub session_id: *const c_char,
    /// Nullable
    pub custom_data: *const c_char,
    pub site_id: *const c_char,
    /// Nullable
    pub reactivated_from_session_id: *const c_char,
}

impl CReprOf<SessionStartedMessage> for CSessionStartedMessage {
    fn c_repr_of(input: SessionStartedMessage) -> FfiResult<Self> {
        input.validate()?;
        let session_id = c_string("session_id", input.session_id)?;
        let custom_data = optional_c_string("custom_data", input.custom_data)?;
        let site_id = c_string("site_id", input.site_id)?;
        let reactivated_from_session_id = optional_c_string(
            "reactivated_from_session_id",
            input.reactivated_from_session_id,
        )?;
        Ok(Self {
            session_id: session_id.into_raw(),
            custom_data: optional_c_string_into_raw(custom_data),
            site_id: site_id.into_raw(),
            reactivated_from_session_id: optional_c_string_into_raw(reactivated_from_session_id),
        })
    }
}

impl AsRust<SessionStartedMessage> for CSessionStartedMessage {
    fn as_rust(&self) -> FfiResult<SessionStartedMessage> {
        unsafe {
            Ok(SessionStartedMessage {
                session_id: rust_string_from(self.session_id, "session_id")?,
                site_id: rust_string_from(self.site_id, "site_id")?,
                custom_data: optional_rust_string_from(self.custom_data, "custom_data")?,
                reactivated_from_session_id: optional_rust_string_from(
                    self.reactivated_from_session_id,
                    "reactivated_from_session_id",
                )?,
            })
        }
    }
}

impl Drop for CSessionStartedMessage {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.session_id);
            take_back_c_string(self.custom_data);
            take_back_c_string(self.site_id);
            take_back_c_string(self.reactivated_from_session_id);
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTerminationKind {
    Nominal = 1,
    SiteUnavailable = 2,
    AbortedByUser = 3,
    IntentNotRecognized = 4,
    Timeout = 5,
    Error = 6,
}

impl SessionTerminationKind {
    pub fn of(termination: &SessionTerminationType) -> Self {
        match termination {
            SessionTerminationType::Nominal => SessionTerminationKind::Nominal,
            SessionTerminationType::SiteUnavailable => SessionTerminationKind::SiteUnavailable,
            SessionTerminationType::AbortedByUser => SessionTerminationKind::AbortedByUser,
            SessionTerminationType::IntentNotRecognized => {
                SessionTerminationKind::IntentNotRecognized
            }
            SessionTerminationType::Timeout => SessionTerminationKind::Timeout,
            SessionTerminationType::Error { .. } => SessionTerminationKind::Error,
        }
    }

    pub fn try_from_raw(raw: c_int) -> FfiResult<Self> {
        Ok(match raw {
            1 => SessionTerminationKind::Nominal,
            2 => SessionTerminationKind::SiteUnavailable,
            3 => SessionTerminationKind::AbortedByUser,
            4 => SessionTerminationKind::IntentNotRecognized,
            5 => SessionTerminationKind::Timeout,
            6 => SessionTerminationKind::Error,
            other => {
                return Err(FfiError::malformed(format!(
                    "unknown session termination type {}",
                    other
                )))
            }
        })
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CSessionTermination {
    /// One of [`SessionTerminationKind`]
    pub termination_type: c_int,
    /// Error text; null unless the type is `Error`
    pub data: *const c_char,
}

impl CReprOf<SessionTerminationType> for CSessionTermination {
    fn c_repr_of(input: SessionTerminationType) -> FfiResult<Self> {
        let termination_type = SessionTerminationKind::of(&input) as c_int;
        let data = match input {
            SessionTerminationType::Error { error } => {
                c_string("termination.error", error)?.into_raw() as *const c_char
            }
            _ => ptr::null(),
        };
        Ok(Self {
            termination_type,
            data,
        })
    }
}

impl AsRust<SessionTerminationType> for CSessionTermination {
    fn as_rust(&self) -> FfiResult<SessionTerminationType> {
        Ok(
            match SessionTerminationKind::try_from_raw(self.termination_type)? {
                SessionTerminationKind::Nominal => SessionTerminationType::Nominal,
                SessionTerminationKind::SiteUnavailable => SessionTerminationType::SiteUnavailable,
                SessionTerminationKind::AbortedByUser => SessionTerminationType::AbortedByUser,
                SessionTerminationKind::IntentNotRecognized => {
                    SessionTerminationType::IntentNotRecognized
                }
                SessionTerminationKind::Timeout => SessionTerminationType::Timeout,
                SessionTerminationKind::Error => SessionTerminationType::Error {
                    error: unsafe { rust_string_from(self.data, "termination.error") }?,
                },
            },
        )
    }
}

impl Drop for CSessionTermination {
    fn drop(&mut self) {
        unsafe { take_back_c_string(self.data) };
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CSessionEndedMessage {
    pub session_id: *const c_char,
    /// Nullable
    pub custom_data: *const c_char,
    pub termination: CSessionTermination,
    pub site_id: *const c_char,
}

impl CReprOf<SessionEndedMessage> for CSessionEndedMessage {
    fn c_repr_of(input: SessionEndedMessage) -> FfiResult<Self> {
        input.validate()?;
        let session_id = c_string("session_id", input.session_id)?;
        let custom_data = optional_c_string("custom_data", input.custom_data)?;
        let site_id = c_string("site_id", input.site_id)?;
        let termination = CSessionTermination::c_repr_of(input.termination)?;
        Ok(Self {
            session_id: session_id.into_raw(),
            custom_data: optional_c_string_into_raw(custom_data),
            termination,
            site_id: site_id.into_raw(),
        })
    }
}

impl AsRust<SessionEndedMessage> for CSessionEndedMessage {
    fn as_rust(&self) -> FfiResult<SessionEndedMessage> {
        unsafe {
            Ok(SessionEndedMessage {
                session_id: rust_string_from(self.session_id, "session_id")?,
                site_id: rust_string_from(self.site_id, "site_id")?,
                custom_data: optional_rust_string_from(self.custom_data, "custom_data")?,
                termination: self.termination.as_rust()?,
            })
        }
    }
}

impl Drop for CSessionEndedMessage {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.session_id);
            take_back_c_string(self.custom_data);
            take_back_c_string(self.site_id);
        }
    }
}

// ===== Intents =====

#[repr(C)]
#[derive(Debug)]
pub struct CIntentMessage {
    pub session_id: *const c_char,
    /// Nullable
    pub custom_data: *const c_char,
    pub site_id: *const c_char,
    pub input: *const c_char,
    pub intent: *const CNluIntentClassifierResult,
    pub slots: CNluSlotArray,
    /// Nullable; the outer level is the ASR pass, the inner one its tokens
    pub asr_tokens: *const CAsrTokenDoubleArray,
    /// Nullable
    pub asr_confidence: *const c_float,
}

impl CReprOf<IntentMessage> for CIntentMessage {
    fn c_repr_of(input: IntentMessage) -> FfiResult<Self> {
        input.validate()?;
        let session_id = c_string("session_id", input.session_id)?;
        let custom_data = optional_c_string("custom_data", input.custom_data)?;
        let site_id = c_string("site_id", input.site_id)?;
        let text = c_string("input", input.input)?;
        let intent = CNluIntentClassifierResult::c_repr_of(input.intent)?;
        let slots = CNluSlotArray::c_repr_of(input.slots)?;
        let asr_tokens = input
            .asr_tokens
            .map(CAsrTokenDoubleArray::c_repr_of)
            .transpose()?;
        Ok(Self {
            session_id: session_id.into_raw(),
            custom_data: optional_c_string_into_raw(custom_data),
            site_id: site_id.into_raw(),
            input: text.into_raw(),
            intent: intent.into_raw_pointer(),
            slots,
            asr_tokens: optional_into_raw(asr_tokens),
            asr_confidence: optional_scalar_into_raw(input.asr_confidence),
        })
    }
}

impl AsRust<IntentMessage> for CIntentMessage {
    fn as_rust(&self) -> FfiResult<IntentMessage> {
        unsafe {
            Ok(IntentMessage {
                session_id: rust_string_from(self.session_id, "session_id")?,
                site_id: rust_string_from(self.site_id, "site_id")?,
                custom_data: optional_rust_string_from(self.custom_data, "custom_data")?,
                input: rust_string_from(self.input, "input")?,
                intent: raw_borrow(self.intent, "intent")?.as_rust()?,
                slots: self.slots.as_rust()?,
                asr_tokens: optional_as_rust(self.asr_tokens)?,
                asr_confidence: read_optional_scalar(self.asr_confidence),
            })
        }
    }
}

impl Drop for CIntentMessage {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.session_id);
            take_back_c_string(self.custom_data);
            take_back_c_string(self.site_id);
            take_back_c_string(self.input);
            take_back_optional(self.intent);
            take_back_optional(self.asr_tokens);
            take_back_scalar(self.asr_confidence);
        }
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct CIntentNotRecognizedMessage {
    pub site_id: *const c_char,
    pub session_id: *const c_char,
    /// Nullable
    pub input: *const c_char,
    /// Nullable
    pub custom_data: *const c_char,
    pub confidence_score: c_float,
}

impl CReprOf<IntentNotRecognizedMessage> for CIntentNotRecognizedMessage {
    fn c_repr_of(input: IntentNotRecognizedMessage) -> FfiResult<Self> {
        input.validate()?;
        let site_id = c_string("site_id", input.site_id)?;
        let session_id = c_string("session_id", input.session_id)?;
        let text = optional_c_string("input", input.input)?;
        let custom_data = optional_c_string("custom_data", input.custom_data)?;
        Ok(Self {
            site_id: site_id.into_raw(),
            session_id: session_id.into_raw(),
            input: optional_c_string_into_raw(text),
            custom_data: optional_c_string_into_raw(custom_data),
            confidence_score: input.confidence_score,
        })
    }
}

impl AsRust<IntentNotRecognizedMessage> for CIntentNotRecognizedMessage {
    fn as_rust(&self) -> FfiResult<IntentNotRecognizedMessage> {
        unsafe {
            Ok(IntentNotRecognizedMessage {
                session_id: rust_string_from(self.session_id, "session_id")?,
                site_id: rust_string_from(self.site_id, "site_id")?,
                input: optional_rust_string_from(self.input, "input")?,
                custom_data: optional_rust_string_from(self.custom_data, "custom_data")?,
                confidence_score: self.confidence_score,
            })
        }
    }
}

impl Drop for CIntentNotRecognizedMessage {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.site_id);
            take_back_c_string(self.session_id);
            take_back_c_string(self.input);
            take_back_c_string(self.custom_data);
        }
    }
}

// ===== Captured text =====

#[repr(C)]
#[derive(Debug)]
pub struct CTextCapturedMessage {
    pub text: *const c_char,
    pub likelihood: c_float,
    /// Nullable
    pub tokens: *const CAsrTokenArray,
    pub seconds: c_float,
    pub site_id: *const c_char,
    /// Nullable
    pub session_id: *const c_char,
}

impl CReprOf<TextCapturedMessage> for CTextCapturedMessage {
    fn c_repr_of(input: TextCapturedMessage) -> FfiResult<Self> {
        input.validate()?;
        let text = c_string("text", input.text)?;
        let site_id = c_string("site_id", input.site_id)?;
        let session_id = optional_c_string("session_id", input.session_id)?;
        let tokens = input.tokens.map(CAsrTokenArray::c_repr_of).transpose()?;
        Ok(Self {
            text: text.into_raw(),
            likelihood: input.likelihood,
            tokens: optional_into_raw(tokens),
            seconds: input.seconds,
            site_id: site_id.into_raw(),
            session_id: optional_c_string_into_raw(session_id),
        })
    }
}

impl AsRust<TextCapturedMessage> for CTextCapturedMessage {
    fn as_rust(&self) -> FfiResult<TextCapturedMessage> {
        unsafe {
            Ok(TextCapturedMessage {
                text: rust_string_from(self.text, "text")?,
                likelihood: self.likelihood,
                tokens: optional_as_rust(self.tokens)?,
                seconds: self.seconds,
                site_id: rust_string_from(self.site_id, "site_id")?,
                session_id: optional_rust_string_from(self.session_id, "session_id")?,
            })
        }
    }
}

impl Drop for CTextCapturedMessage {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.text);
            take_back_optional(self.tokens);
            take_back_c_string(self.site_id);
            take_back_c_string(self.session_id);
        }
    }
}

// ===== Configuration =====

#[repr(C)]
#[derive(Debug)]
pub struct CDialogueConfigureIntent {
    pub intent_id: *const c_char,
    /// Nullable; 0 is false, 1 is true
    pub enable: *const c_uchar,
}

impl CReprOf<DialogueConfigureIntent> for CDialogueConfigureIntent {
    fn c_repr_of(input: DialogueConfigureIntent) -> FfiResult<Self> {
        let intent_id = c_string("intent_id", input.intent_id)?;
        Ok(Self {
            intent_id: intent_id.into_raw(),
            enable: optional_scalar_into_raw(input.enable.map(bool_to_c)),
        })
    }
}

impl AsRust<DialogueConfigureIntent> for CDialogueConfigureIntent {
    fn as_rust(&self) -> FfiResult<DialogueConfigureIntent> {
        let enable = unsafe { read_optional_scalar(self.enable) }
            .map(|raw| bool_from_c(raw, "enable"))
            .transpose()?;
        Ok(DialogueConfigureIntent {
            intent_id: unsafe { rust_string_from(self.intent_id, "intent_id") }?,
            enable,
        })
    }
}

impl Drop for CDialogueConfigureIntent {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.intent_id);
            take_back_scalar(self.enable);
        }
    }
}

pub type CDialogueConfigureIntentArray = CArray<CDialogueConfigureIntent>;

#[repr(C)]
#[derive(Debug)]
pub struct CDialogueConfigureMessage {
    /// Nullable
    pub site_id: *const c_char,
    /// Nullable
    pub intents: *const CDialogueConfigureIntentArray,
}

impl CReprOf<DialogueConfigureMessage> for CDialogueConfigureMessage {
    fn c_repr_of(input: DialogueConfigureMessage) -> FfiResult<Self> {
        input.validate()?;
        let site_id = optional_c_string("site_id", input.site_id)?;
        let intents = input
            .intents
            .map(CDialogueConfigureIntentArray::c_repr_of)
            .transpose()?;
        Ok(Self {
            site_id: optional_c_string_into_raw(site_id),
            intents: optional_into_raw(intents),
        })
    }
}

impl AsRust<DialogueConfigureMessage> for CDialogueConfigureMessage {
    fn as_rust(&self) -> FfiResult<DialogueConfigureMessage> {
        Ok(DialogueConfigureMessage {
            site_id: unsafe { optional_rust_string_from(self.site_id, "site_id") }?,
            intents: unsafe { optional_as_rust(self.intents) }?,
        })
    }
}

impl Drop for CDialogueConfigureMessage {
    fn drop(&mut self) {
        unsafe {
            take_back_c_string(self.site_id);
            take_back_optional(self.intents);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_ontology::{AsrDecodingDuration, AsrToken, NluIntentClassifierResult};
    use pretty_assertions::assert_eq;

    fn round_trip<C, T>(input: T) -> T
    where
        C: CReprOf<T> + AsRust<T>,
        T: Clone,
    {
        let flat = C::c_repr_of(input).unwrap();
        flat.as_rust().unwrap()
    }

    #[test]
    fn test_start_session_action_round_trip() {
        let input = StartSessionMessage {
            init: SessionInit::Action {
                text: Some("smdlfk".into()),
                intent_filter: Some(vec!["an intent".into(), "another".into()]),
                can_be_enqueued: true,
                send_intent_not_recognized: false,
            },
            custom_data: Some("thing".into()),
            site_id: Some("site".into()),
        };
        assert_eq!(round_trip::<CStartSessionMessage, _>(input.clone()), input);
    }

    #[test]
    fn test_start_session_empty_filter_stays_empty() {
        let input = StartSessionMessage {
            init: SessionInit::Action {
                text: None,
                intent_filter: Some(vec![]),
                can_be_enqueued: false,
                send_intent_not_recognized: true,
            },
            custom_data: None,
            site_id: None,
        };
        assert_eq!(round_trip::<CStartSessionMessage, _>(input.clone()), input);
    }

    #[test]
    fn test_start_session_notification_round_trip() {
        let input = StartSessionMessage {
            init: SessionInit::Notification {
                text: "text".into(),
            },
            custom_data: None,
            site_id: Some("site".into()),
        };
        assert_eq!(round_trip::<CStartSessionMessage, _>(input.clone()), input);
    }

    #[test]
    fn test_continue_session_round_trip() {
        let input = ContinueSessionMessage {
            session_id: "my session id".into(),
            text: "some text".into(),
            intent_filter: Some(vec!["i1".into(), "i2".into()]),
            custom_data: Some("foo bar".into()),
            slot: Some("some slot".into()),
            send_intent_not_recognized: true,
        };
        assert_eq!(round_trip::<CContinueSessionMessage, _>(input.clone()), input);
    }

    #[test]
    fn test_session_ended_round_trip_all_terminations() {
        let terminations = vec![
            SessionTerminationType::Nominal,
            SessionTerminationType::SiteUnavailable,
            SessionTerminationType::AbortedByUser,
            SessionTerminationType::IntentNotRecognized,
            SessionTerminationType::Timeout,
            SessionTerminationType::Error {
                error: "this is my error".into(),
            },
        ];
        for termination in terminations {
            let input = SessionEndedMessage {
                session_id: "session id".into(),
                site_id: "site id".into(),
                custom_data: None,
                termination,
            };
            assert_eq!(round_trip::<CSessionEndedMessage, _>(input.clone()), input);
        }
    }

    #[test]
    fn test_intent_round_trip() {
        let token = AsrToken {
            value: "hello".into(),
            confidence: 0.98,
            range_start: 1,
            range_end: 4,
            time: AsrDecodingDuration {
                start: 0.0,
                end: 5.0,
            },
        };
        let input = IntentMessage {
            session_id: "a session id".into(),
            site_id: "a site id".into(),
            custom_data: Some("a custom datum".into()),
            input: "what's the weather in Paris ?".into(),
            intent: NluIntentClassifierResult {
                intent_name: "weather".into(),
                confidence_score: 0.5,
            },
            slots: vec![],
            asr_tokens: Some(vec![vec![token.clone(), token], vec![]]),
            asr_confidence: Some(0.5),
        };
        assert_eq!(round_trip::<CIntentMessage, _>(input.clone()), input);
    }

    #[test]
    fn test_intent_rejects_empty_session_id() {
        let input = IntentMessage {
            session_id: String::new(),
            site_id: "site".into(),
            custom_data: None,
            input: "hello".into(),
            intent: NluIntentClassifierResult {
                intent_name: "greet".into(),
                confidence_score: 1.0,
            },
            slots: vec![],
            asr_tokens: None,
            asr_confidence: None,
        };
        assert!(matches!(
            CIntentMessage::c_repr_of(input),
            Err(FfiError::InvalidMessage { .. })
        ));
    }

    #[test]
    fn test_dialogue_configure_round_trip() {
        let input = DialogueConfigureMessage {
            site_id: Some("some site".into()),
            intents: Some(vec![
                DialogueConfigureIntent {
                    intent_id: "intent 1".into(),
                    enable: Some(true),
                },
                DialogueConfigureIntent {
                    intent_id: "intent 2".into(),
                    enable: Some(false),
                },
                DialogueConfigureIntent {
                    intent_id: "intent 3".into(),
                    enable: None,
                },
            ]),
        };
        assert_eq!(
            round_trip::<CDialogueConfigureMessage, _>(input.clone()),
            input
        );
    }

    #[test]
    fn test_unknown_termination_is_malformed() {
        let flat = CSessionTermination {
            termination_type: 99,
            data: ptr::null(),
        };
        assert!(matches!(flat.as_rust(), Err(FfiError::MalformedFlat(_))));
    }

    #[test]
    fn test_bad_boolean_is_malformed() {
        let mut flat = CContinueSessionMessage::c_repr_of(ContinueSessionMessage {
            session_id: "s".into(),
            text: "t".into(),
            intent_filter: None,
            custom_data: None,
            slot: None,
            send_intent_not_recognized: false,
        })
        .unwrap();
        flat.send_intent_not_recognized = 7;
        assert!(matches!(flat.as_rust(), Err(FfiError::MalformedFlat(_))));
    }
}
