//! Client of the engine's last-error slot
//!
//! The slot is process-wide and holds a single message. It is overwritten by
//! every failing call, from any thread, and reading it does not clear it. A
//! reader may therefore see the error of another call; callers that need
//! exact attribution serialize their boundary calls (see
//! [`Gateway::serialized`](crate::Gateway::serialized)).

use crate::engine::{DestroyFn, GetLastErrorFn, SymbolSource, DESTROY_STRING, GET_LAST_ERROR};
use crate::error::FfiResult;
use crate::handle::{Engine, EngineString};
use std::os::raw::c_char;
use std::ptr::{self, NonNull};

/// Fetch a copy of the last error; `None` if the engine returned nothing
///
/// The caller holds the gateway's lock, if any. The returned string does not
/// consult the error channel again when its own destroy fails.
pub(crate) fn read(engine: Engine<'_>) -> FfiResult<Option<EngineString<'_>>> {
    let engine = engine.silent();
    let get_last_error: GetLastErrorFn = unsafe { cast(engine.source.resolve(GET_LAST_ERROR)?) };
    let destroy: DestroyFn<c_char> = unsafe { cast(engine.source.resolve(DESTROY_STRING)?) };

    let mut output: *const c_char = ptr::null();
    let status = unsafe { get_last_error(&mut output) };
    if status != 0 {
        tracing::debug!(status, "engine could not report its last error");
        return Ok(None);
    }

    Ok(NonNull::new(output as *mut c_char)
        .map(|ptr| unsafe { EngineString::from_raw(ptr, destroy, DESTROY_STRING, engine) }))
}

/// Best-effort text of the last error, for a call that just failed
///
/// Runs while the gateway's lock, if any, is already held.
pub(crate) fn describe_failure(source: &dyn SymbolSource) -> String {
    let engine = Engine {
        source,
        lock: None,
        reports_errors: false,
    };
    let text = match read(engine) {
        Ok(Some(error)) => error.to_string_lossy().into_owned(),
        Ok(None) => String::new(),
        Err(e) => return format!("last error unavailable: {}", e),
    };
    if text.is_empty() {
        "no error message reported".to_string()
    } else {
        text
    }
}

/// Reinterpret a resolved address as a typed function pointer
///
/// # Safety
///
/// `address` must be the address of a function whose signature is `F`.
pub(crate) unsafe fn cast<F: Copy>(address: *const ()) -> F {
    debug_assert_eq!(
        std::mem::size_of::<F>(),
        std::mem::size_of::<*const ()>(),
        "function pointer size mismatch"
    );
    std::mem::transmute_copy::<*const (), F>(&address)
}
