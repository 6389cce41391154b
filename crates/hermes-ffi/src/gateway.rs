//! Boundary gateway: calling the engine's round-trip entry points
//!
//! One synchronous call per round trip, no retries. The input stays owned by
//! the caller on every path. On success the output is returned inside an
//! owning handle bound to its destroy call; on failure the last error is read
//! before anything else crosses the boundary and returned with the status.

use crate::engine::{
    json_round_trip_symbol, DestroyFn, JsonRoundTripFn, RoundTripFn, RoundTripKind, SymbolSource,
    DESTROY_STRING,
};
use crate::error::{FfiError, FfiResult};
use crate::error_channel::{self, cast};
use crate::handle::{Engine, EngineOwned, EngineString};
use crate::loader::EngineLibrary;
use crate::loopback::LoopbackEngine;
use crate::marshal::c_string;
use hermes_config::HermesConfig;
use hermes_ontology::HermesMessage;
use std::os::raw::c_char;
use std::ptr::{self, NonNull};
use std::sync::Mutex;

/// Entry point for every boundary call
///
/// `Gateway` is `Send + Sync`; share it by reference across threads. With
/// [`Gateway::serialized`] every call and its error read run under one lock.
pub struct Gateway {
    source: Box<dyn SymbolSource>,
    lock: Option<Mutex<()>>,
}

impl Gateway {
    pub fn new(source: impl SymbolSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            lock: None,
        }
    }

    /// Gateway to the in-process engine
    pub fn loopback() -> Self {
        Self::new(LoopbackEngine)
    }

    /// Serialize every boundary call of this gateway
    pub fn serialized(mut self) -> Self {
        self.lock = Some(Mutex::new(()));
        self
    }

    /// Build the gateway described by the configuration
    ///
    /// Uses the configured engine library, or the loopback engine when none
    /// is configured.
    pub fn from_config(config: &HermesConfig) -> FfiResult<Self> {
        let gateway = match &config.engine.library {
            Some(_) => Self::new(EngineLibrary::open(&config.engine)?),
            None => Self::loopback(),
        };
        let gateway = if config.gateway.serialize_calls {
            gateway.serialized()
        } else {
            gateway
        };
        tracing::info!(
            engine = %gateway.describe(),
            serialized = gateway.is_serialized(),
            "gateway ready"
        );
        Ok(gateway)
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    pub fn is_serialized(&self) -> bool {
        self.lock.is_some()
    }

    /// The engine and lock every handle from this gateway goes back through
    fn engine(&self) -> Engine<'_> {
        Engine {
            source: self.source.as_ref(),
            lock: self.lock.as_ref(),
            reports_errors: true,
        }
    }

    /// # Safety
    ///
    /// `F` must be the signature the engine declares for `name`.
    unsafe fn symbol<F: Copy>(&self, name: &str) -> FfiResult<F> {
        Ok(cast(self.source.resolve(name)?))
    }

    fn failure(&self, symbol: String, status: i32) -> FfiError {
        let message = error_channel::describe_failure(self.source.as_ref());
        tracing::warn!(%symbol, status, %message, "engine call failed");
        FfiError::EngineFailure {
            symbol,
            status,
            message,
        }
    }

    /// Send a flat value through the engine and take ownership of its answer
    ///
    /// # Errors
    ///
    /// - `SymbolNotFound` if the engine lacks the round-trip or destroy call
    /// - `EngineFailure` with the last error text on non-zero status
    /// - `MalformedFlat` if the engine reports success without an output
    pub fn round_trip<K: RoundTripKind>(&self, input: &K) -> FfiResult<EngineOwned<'_, K>> {
        let name = K::round_trip_symbol();
        let call: RoundTripFn<K> = unsafe { self.symbol(&name)? };
        let destroy: DestroyFn<K> = unsafe { self.symbol(K::DESTROY)? };

        let engine = self.engine();
        let _guard = engine.guard();
        let mut output: *const K = ptr::null();
        tracing::debug!(symbol = %name, "boundary call");
        let status = unsafe { call(input, &mut output) };
        if status != 0 {
            return Err(self.failure(name, status));
        }

        let output = NonNull::new(output as *mut K).ok_or_else(|| {
            FfiError::malformed(format!("'{}' succeeded without an output", name))
        })?;
        Ok(unsafe { EngineOwned::from_raw(output, destroy, K::DESTROY, engine) })
    }

    /// Send JSON text through the engine's text round trip for `M`
    ///
    /// # Errors
    ///
    /// Same as [`Gateway::round_trip`]; `InvalidMessage` if `input` contains
    /// a NUL byte.
    pub fn round_trip_json<M: HermesMessage>(&self, input: &str) -> FfiResult<EngineString<'_>> {
        let name = json_round_trip_symbol(M::KIND);
        let call: JsonRoundTripFn = unsafe { self.symbol(&name)? };
        let destroy: DestroyFn<c_char> = unsafe { self.symbol(DESTROY_STRING)? };
        let input = c_string("input", input.to_string())?;

        let engine = self.engine();
        let _guard = engine.guard();
        let mut output: *const c_char = ptr::null();
        tracing::debug!(symbol = %name, "boundary call");
        let status = unsafe { call(input.as_ptr(), &mut output) };
        if status != 0 {
            return Err(self.failure(name, status));
        }

        let output = NonNull::new(output as *mut c_char).ok_or_else(|| {
            FfiError::malformed(format!("'{}' succeeded without an output", name))
        })?;
        Ok(unsafe { EngineString::from_raw(output, destroy, DESTROY_STRING, engine) })
    }

    /// Read the engine's last-error slot
    ///
    /// Best effort: without serialization the text may belong to another
    /// thread's call.
    pub fn last_error(&self) -> FfiResult<Option<EngineString<'_>>> {
        let engine = self.engine();
        let _guard = engine.guard();
        error_channel::read(engine)
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("engine", &self.describe())
            .field("serialized", &self.is_serialized())
            .finish()
    }
}
