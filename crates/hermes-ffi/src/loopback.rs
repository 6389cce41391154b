//! In-process reference engine
//!
//! Implements the engine side of the boundary with the same `extern "C"`
//! signatures a native engine library exports, so the whole protocol can be
//! exercised without loading anything:
//! - a flat round trip reads its input with `as_rust` and answers with a
//!   fresh `c_repr_of` allocation
//! - a JSON round trip parses and re-serializes
//! - destroy calls take back what the round trips handed out
//!
//! Failures store their text in a process-wide last-error slot and return a
//! non-zero status. The slot is not cleared by successful calls. Panics are
//! caught before they reach the boundary.

use crate::engine::{
    json_round_trip_symbol, DestroyFn, GetLastErrorFn, JsonRoundTripFn, RoundTripFn,
    RoundTripKind, SymbolSource, DESTROY_STRING, GET_LAST_ERROR,
};
use crate::error::{FfiError, FfiResult};
use crate::marshal::{c_string, raw_borrow, rust_string_from, take_back_c_string, RawPointerConverter};
use crate::ontology::{
    CAsrToken, CAsrTokenArray, CAsrTokenDoubleArray, CContinueSessionMessage,
    CDialogueConfigureMessage, CEndSessionMessage, CInjectionRequestMessage, CIntentMessage,
    CIntentNotRecognizedMessage, CMapStringToStringArray, CSessionEndedMessage,
    CSessionQueuedMessage, CSessionStartedMessage, CStartSessionMessage, CTextCapturedMessage,
};
use hermes_ontology::{json, DialogueConfigureIntent, HermesMessage};
use std::collections::HashMap;
use std::os::raw::{c_char, c_int};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, OnceLock};

/// Status of a call that failed with an error
pub const STATUS_ERROR: c_int = 1;
/// Status of a call that panicked
pub const STATUS_PANIC: c_int = 2;

static LAST_ERROR: Mutex<Option<String>> = Mutex::new(None);

fn set_last_error(message: String) {
    let mut slot = LAST_ERROR.lock().unwrap_or_else(|e| e.into_inner());
    *slot = Some(message);
}

fn last_error_text() -> String {
    LAST_ERROR
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
        .unwrap_or_default()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "engine panicked".to_string()
    }
}

/// Run an engine entry point and turn its outcome into a status code
fn wrap<F>(name: &str, body: F) -> c_int
where
    F: FnOnce() -> FfiResult<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            tracing::debug!(symbol = name, error = %e, "loopback call failed");
            set_last_error(e.to_string());
            STATUS_ERROR
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::debug!(symbol = name, panic = %message, "loopback call panicked");
            set_last_error(message);
            STATUS_PANIC
        }
    }
}

unsafe extern "C" fn round_trip<K: RoundTripKind>(input: *const K, output: *mut *const K) -> c_int {
    wrap("round_trip", || {
        if output.is_null() {
            return Err(FfiError::malformed("output slot is null"));
        }
        let domain = raw_borrow(input, "input")?.to_domain()?;
        *output = K::from_domain(domain)?.into_raw_pointer();
        Ok(())
    })
}

unsafe extern "C" fn destroy<K>(ptr: *const K) -> c_int {
    wrap("destroy", || K::drop_raw_pointer(ptr))
}

unsafe extern "C" fn round_trip_json<M: HermesMessage>(
    input: *const c_char,
    output: *mut *const c_char,
) -> c_int {
    wrap("round_trip_json", || {
        if output.is_null() {
            return Err(FfiError::malformed("output slot is null"));
        }
        let text = rust_string_from(input, "input")?;
        let message: M = json::from_json(&text)?;
        *output = c_string("output", json::to_json(&message)?)?.into_raw();
        Ok(())
    })
}

unsafe extern "C" fn get_last_error(output: *mut *const c_char) -> c_int {
    // Failures here must not overwrite the slot being read.
    let text = last_error_text();
    match c_string("error", text.replace('\0', " ")) {
        Ok(text) if !output.is_null() => {
            *output = text.into_raw();
            0
        }
        _ => STATUS_ERROR,
    }
}

unsafe extern "C" fn destroy_string(ptr: *const c_char) -> c_int {
    if ptr.is_null() {
        set_last_error("destroy_string called with null".to_string());
        return STATUS_ERROR;
    }
    take_back_c_string(ptr);
    0
}

fn register<K: RoundTripKind + 'static>(table: &mut HashMap<String, usize>) {
    let round_trip: RoundTripFn<K> = round_trip::<K>;
    let destroy: DestroyFn<K> = destroy::<K>;
    table.insert(K::round_trip_symbol(), round_trip as usize);
    table.insert(K::DESTROY.to_string(), destroy as usize);
    register_json::<K::Domain>(table);
}

fn register_json<M: HermesMessage + 'static>(table: &mut HashMap<String, usize>) {
    let round_trip: JsonRoundTripFn = round_trip_json::<M>;
    table.insert(json_round_trip_symbol(M::KIND), round_trip as usize);
}

fn symbols() -> &'static HashMap<String, usize> {
    static SYMBOLS: OnceLock<HashMap<String, usize>> = OnceLock::new();
    SYMBOLS.get_or_init(|| {
        let mut table = HashMap::new();

        register::<CAsrToken>(&mut table);
        register::<CAsrTokenArray>(&mut table);
        register::<CAsrTokenDoubleArray>(&mut table);
        register::<CMapStringToStringArray>(&mut table);
        register::<CStartSessionMessage>(&mut table);
        register::<CContinueSessionMessage>(&mut table);
        register::<CEndSessionMessage>(&mut table);
        register::<CSessionQueuedMessage>(&mut table);
        register::<CSessionStartedMessage>(&mut table);
        register::<CSessionEndedMessage>(&mut table);
        register::<CIntentMessage>(&mut table);
        register::<CIntentNotRecognizedMessage>(&mut table);
        register::<CTextCapturedMessage>(&mut table);
        register::<CInjectionRequestMessage>(&mut table);
        register::<CDialogueConfigureMessage>(&mut table);
        register_json::<DialogueConfigureIntent>(&mut table);

        let get_last_error: GetLastErrorFn = get_last_error;
        let destroy_string: DestroyFn<c_char> = destroy_string;
        table.insert(GET_LAST_ERROR.to_string(), get_last_error as usize);
        table.insert(DESTROY_STRING.to_string(), destroy_string as usize);

        table
    })
}

/// The in-process engine
#[derive(Debug, Default, Clone, Copy)]
pub struct LoopbackEngine;

impl LoopbackEngine {
    /// Every symbol this engine exports, sorted
    pub fn exported_symbols() -> Vec<&'static str> {
        let mut names: Vec<_> = symbols().keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl SymbolSource for LoopbackEngine {
    fn resolve(&self, name: &str) -> FfiResult<*const ()> {
        symbols()
            .get(name)
            .map(|&address| address as *const ())
            .ok_or_else(|| FfiError::SymbolNotFound(name.to_string()))
    }

    fn describe(&self) -> String {
        "loopback engine".to_string()
    }
}
