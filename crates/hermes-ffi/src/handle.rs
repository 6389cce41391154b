//! Owning handles for engine allocations
//!
//! A value the engine hands out may only be released by the engine's matching
//! destroy call, exactly once. [`EngineOwned`] is the single owner of such a
//! value: it is move-only, reachable only through `Deref`, and releases the
//! value either through [`EngineOwned::destroy`] or when dropped. Double
//! destroy and use after destroy do not compile.
//!
//! The `'g` lifetime ties the handle to the gateway whose engine allocated
//! the value, so the engine library cannot be unloaded first. A failed
//! destroy is a failed engine call like any other: its error text is read
//! from the error channel under the gateway's lock.

use crate::engine::{DestroyFn, SymbolSource};
use crate::error::{FfiError, FfiResult};
use crate::error_channel;
use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::os::raw::c_char;
use std::ptr::NonNull;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The engine behind a gateway, as seen by the values it hands out
#[derive(Clone, Copy)]
pub(crate) struct Engine<'g> {
    pub(crate) source: &'g dyn SymbolSource,
    pub(crate) lock: Option<&'g Mutex<()>>,
    /// Whether a failed destroy consults the error channel; off for the
    /// strings the error channel itself hands out
    pub(crate) reports_errors: bool,
}

impl<'g> Engine<'g> {
    pub(crate) fn guard(&self) -> Option<MutexGuard<'g, ()>> {
        self.lock
            .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Same engine, without the lock; for use while the lock is held
    pub(crate) fn unlocked(self) -> Self {
        Self { lock: None, ..self }
    }

    pub(crate) fn silent(self) -> Self {
        Self {
            reports_errors: false,
            ..self
        }
    }

    fn failure_text(&self) -> String {
        if self.reports_errors {
            error_channel::describe_failure(self.source)
        } else {
            "no error message reported".to_string()
        }
    }
}

/// An engine-allocated value and the call that releases it
pub struct EngineOwned<'g, T> {
    ptr: NonNull<T>,
    destroy: DestroyFn<T>,
    symbol: &'static str,
    engine: Engine<'g>,
}

impl<'g, T> EngineOwned<'g, T> {
    /// Take ownership of an engine allocation
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live `T` allocated by `engine`, not owned by
    /// anyone else, and `destroy` must be the matching release call for it.
    pub(crate) unsafe fn from_raw(
        ptr: NonNull<T>,
        destroy: DestroyFn<T>,
        symbol: &'static str,
        engine: Engine<'g>,
    ) -> Self {
        Self {
            ptr,
            destroy,
            symbol,
            engine,
        }
    }

    /// Call the destroy symbol; on failure, the error text read before the
    /// lock is released
    fn release(&mut self) -> Result<(), (i32, String)> {
        let _guard = self.engine.guard();
        let status = unsafe { (self.destroy)(self.ptr.as_ptr()) };
        if status == 0 {
            Ok(())
        } else {
            Err((status, self.engine.unlocked().failure_text()))
        }
    }

    /// Release the value now and report the engine's status
    ///
    /// # Errors
    ///
    /// `EngineFailure` with the engine's last error if the destroy call
    /// returns a non-zero status. The value is gone either way.
    pub fn destroy(self) -> FfiResult<()> {
        let mut this = ManuallyDrop::new(self);
        this.release().map_err(|(status, message)| {
            tracing::warn!(symbol = this.symbol, status, %message, "engine destroy call failed");
            FfiError::EngineFailure {
                symbol: this.symbol.to_string(),
                status,
                message,
            }
        })
    }

    /// Name of the destroy symbol this handle will call
    pub fn destroy_symbol(&self) -> &'static str {
        self.symbol
    }
}

impl<T> Deref for EngineOwned<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> Drop for EngineOwned<'_, T> {
    fn drop(&mut self) {
        if let Err((status, message)) = self.release() {
            tracing::warn!(symbol = self.symbol, status, %message, "engine destroy call failed");
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for EngineOwned<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOwned")
            .field("value", &**self)
            .field("destroy", &self.symbol)
            .finish()
    }
}

/// A nul-terminated string allocated by the engine
pub struct EngineString<'g> {
    inner: EngineOwned<'g, c_char>,
}

impl<'g> EngineString<'g> {
    /// # Safety
    ///
    /// Same contract as [`EngineOwned::from_raw`]; `ptr` must also be
    /// nul-terminated.
    pub(crate) unsafe fn from_raw(
        ptr: NonNull<c_char>,
        destroy: DestroyFn<c_char>,
        symbol: &'static str,
        engine: Engine<'g>,
    ) -> Self {
        Self {
            inner: EngineOwned::from_raw(ptr, destroy, symbol, engine),
        }
    }

    fn as_c_str(&self) -> &CStr {
        unsafe { CStr::from_ptr(&*self.inner) }
    }

    /// The string as UTF-8
    ///
    /// # Errors
    ///
    /// `MalformedFlat` if the engine wrote invalid UTF-8.
    pub fn to_str(&self) -> FfiResult<&str> {
        self.as_c_str()
            .to_str()
            .map_err(|e| FfiError::malformed(format!("engine string is not UTF-8: {}", e)))
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        self.as_c_str().to_string_lossy()
    }

    pub fn destroy(self) -> FfiResult<()> {
        self.inner.destroy()
    }
}

impl fmt::Debug for EngineString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EngineString")
            .field(&self.to_string_lossy())
            .finish()
    }
}
