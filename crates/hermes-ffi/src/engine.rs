//! Engine symbols: names, signatures and per-kind bindings
//!
//! The engine exports, for every message kind `K`:
//! - `hermes_ffi_test_round_trip_K(input, &output) -> status`
//! - `hermes_ffi_test_round_trip_K_json(input, &output) -> status`
//! - a destroy call for the flat value it hands out
//!
//! plus the process-wide `hermes_ffi_test_get_last_error` and the generic
//! `hermes_ffi_test_destroy_string`.

use crate::error::FfiResult;
use crate::marshal::{AsRust, CReprOf};
use crate::ontology::{
    CAsrToken, CAsrTokenArray, CAsrTokenDoubleArray, CContinueSessionMessage,
    CDialogueConfigureMessage, CEndSessionMessage, CInjectionRequestMessage, CIntentMessage,
    CIntentNotRecognizedMessage, CMapStringToStringArray, CSessionEndedMessage,
    CSessionQueuedMessage, CSessionStartedMessage, CStartSessionMessage, CTextCapturedMessage,
};
use hermes_ontology::{
    AsrToken, ContinueSessionMessage, DialogueConfigureMessage, EndSessionMessage, HermesMessage,
    InjectionRequestMessage, IntentMessage, IntentNotRecognizedMessage, MapStringToStringArray,
    SessionEndedMessage, SessionQueuedMessage, SessionStartedMessage, StartSessionMessage,
    TextCapturedMessage,
};
use std::os::raw::{c_char, c_int};

/// `round_trip(input, output) -> status`; the input stays owned by the caller
pub type RoundTripFn<C> = unsafe extern "C" fn(input: *const C, output: *mut *const C) -> c_int;

/// `round_trip_json(input, output) -> status`; the output is an engine string
pub type JsonRoundTripFn =
    unsafe extern "C" fn(input: *const c_char, output: *mut *const c_char) -> c_int;

/// Releases a value the engine handed out; calling it twice is undefined
pub type DestroyFn<C> = unsafe extern "C" fn(ptr: *const C) -> c_int;

pub type GetLastErrorFn = unsafe extern "C" fn(output: *mut *const c_char) -> c_int;

pub const GET_LAST_ERROR: &str = "hermes_ffi_test_get_last_error";
pub const DESTROY_STRING: &str = "hermes_ffi_test_destroy_string";

pub fn round_trip_symbol(kind: &str) -> String {
    format!("hermes_ffi_test_round_trip_{}", kind)
}

pub fn json_round_trip_symbol(kind: &str) -> String {
    format!("hermes_ffi_test_round_trip_{}_json", kind)
}

/// Where engine entry points come from
///
/// Implementations must return addresses of `extern "C"` functions whose
/// signatures match the aliases in this module for the requested name.
pub trait SymbolSource: Send + Sync {
    /// Address of an exported function
    ///
    /// # Errors
    ///
    /// `SymbolNotFound` if the engine does not export `name`.
    fn resolve(&self, name: &str) -> FfiResult<*const ()>;

    /// Human readable origin, used in logs
    fn describe(&self) -> String;
}

impl<S: SymbolSource + ?Sized> SymbolSource for Box<S> {
    fn resolve(&self, name: &str) -> FfiResult<*const ()> {
        (**self).resolve(name)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// A flat message type the engine can round-trip
pub trait RoundTripKind: Sized {
    type Domain: HermesMessage;

    /// Destroy symbol for values of this type handed out by the engine
    const DESTROY: &'static str;

    /// [`CReprOf::c_repr_of`] for the bound domain type
    fn from_domain(input: Self::Domain) -> FfiResult<Self>;

    /// [`AsRust::as_rust`] for the bound domain type
    fn to_domain(&self) -> FfiResult<Self::Domain>;

    fn round_trip_symbol() -> String {
        round_trip_symbol(<Self::Domain as HermesMessage>::KIND)
    }
}

macro_rules! round_trip_kinds {
    ($($flat:ty => $domain:ty, $destroy:literal;)*) => {
        $(
            impl RoundTripKind for $flat {
                type Domain = $domain;
                const DESTROY: &'static str = $destroy;

                fn from_domain(input: $domain) -> FfiResult<Self> {
                    <$flat as CReprOf<$domain>>::c_repr_of(input)
                }

                fn to_domain(&self) -> FfiResult<$domain> {
                    <$flat as AsRust<$domain>>::as_rust(self)
                }
            }
        )*
    };
}

round_trip_kinds! {
    CAsrToken => AsrToken, "hermes_ffi_test_destroy_asr_token";
    CAsrTokenArray => Vec<AsrToken>, "hermes_ffi_test_destroy_asr_token_array";
    CAsrTokenDoubleArray => Vec<Vec<AsrToken>>, "hermes_ffi_test_destroy_asr_token_double_array";
    CMapStringToStringArray => MapStringToStringArray, "hermes_ffi_test_destroy_map_string_to_string_array";
    CStartSessionMessage => StartSessionMessage, "hermes_drop_start_session_message";
    CContinueSessionMessage => ContinueSessionMessage, "hermes_drop_continue_session_message";
    CEndSessionMessage => EndSessionMessage, "hermes_drop_end_session_message";
    CSessionQueuedMessage => SessionQueuedMessage, "hermes_drop_session_queued_message";
    CSessionStartedMessage => SessionStartedMessage, "hermes_drop_session_started_message";
    CSessionEndedMessage => SessionEndedMessage, "hermes_drop_session_ended_message";
    CIntentMessage => IntentMessage, "hermes_drop_intent_message";
    CIntentNotRecognizedMessage => IntentNotRecognizedMessage, "hermes_drop_intent_not_recognized_message";
    CTextCapturedMessage => TextCapturedMessage, "hermes_drop_text_captured_message";
    CInjectionRequestMessage => InjectionRequestMessage, "hermes_drop_injection_request_message";
    CDialogueConfigureMessage => DialogueConfigureMessage, "hermes_drop_dialogue_configure_message";
}
