//! Hermes FFI
//!
//! Carries Hermes messages across a C boundary and back:
//! - [`ontology`]: `#[repr(C)]` mirrors of every message kind, with
//!   conversion both ways ([`CReprOf`], [`AsRust`])
//! - [`gateway`]: calls the engine's round-trip entry points and hands the
//!   answer back inside an owning handle ([`EngineOwned`], [`EngineString`])
//! - [`Gateway::last_error`]: the engine's process-wide last-error slot
//! - [`verify`]: round-trip checks in both encodings
//! - [`loader`] and [`loopback`]: where the engine comes from
//!
//! # Ownership
//!
//! Whoever allocates a flat value frees it, through the matching destroy
//! call. Values built with `c_repr_of` are owned Rust values and free
//! themselves on drop. Values the engine hands out are wrapped in
//! [`EngineOwned`] and go back through the engine's destroy symbol.
//!
//! # Example
//!
//! ```
//! use hermes_ffi::ontology::CEndSessionMessage;
//! use hermes_ffi::{verify, Gateway};
//! use hermes_ontology::EndSessionMessage;
//!
//! let gateway = Gateway::loopback();
//! let message = EndSessionMessage {
//!     session_id: "a session".into(),
//!     text: Some("goodbye".into()),
//! };
//!
//! let received = verify::check_flat::<CEndSessionMessage>(&gateway, &message).unwrap();
//! assert_eq!(received, message);
//! ```

pub mod engine;
pub mod error;
mod error_channel;
pub mod gateway;
pub mod handle;
pub mod loader;
pub mod loopback;
pub mod marshal;
pub mod ontology;
pub mod telemetry;
pub mod verify;

pub use engine::{RoundTripKind, SymbolSource};
pub use error::{FfiError, FfiResult};
pub use gateway::Gateway;
pub use handle::{EngineOwned, EngineString};
pub use loader::{EngineLibrary, LoadError};
pub use loopback::LoopbackEngine;
pub use marshal::{AsRust, CReprOf, RawPointerConverter};
