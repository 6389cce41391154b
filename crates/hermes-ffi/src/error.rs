//! Error taxonomy of the boundary
//!
//! - `InvalidMessage`: a domain value broke an invariant; rejected before
//!   anything crosses the boundary
//! - `MalformedFlat`: a flat value read back has an inconsistent shape
//! - `EngineFailure`: the engine returned a non-zero status; carries the
//!   best-effort text from the error channel
//!
//! Ownership violations (double destroy, use after destroy) are not runtime
//! errors: the owning handles in [`crate::handle`] make them unrepresentable
//! in safe code.

use crate::loader::LoadError;
use hermes_config::ConfigError;
use hermes_ontology::OntologyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FfiError {
    #[error("Invalid message: field '{field}' {reason}")]
    InvalidMessage { field: String, reason: String },

    #[error("Malformed flat value: {0}")]
    MalformedFlat(String),

    #[error("Engine call '{symbol}' failed with status {status}: {message}")]
    EngineFailure {
        symbol: String,
        status: i32,
        message: String,
    },

    #[error("Symbol '{0}' is not exported by the engine")]
    SymbolNotFound(String),

    #[error("Engine library error: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Round trip of '{kind}' changed the message\n  sent:     {sent}\n  received: {received}")]
    Mismatch {
        kind: &'static str,
        sent: String,
        received: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl FfiError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        FfiError::MalformedFlat(reason.into())
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        FfiError::InvalidMessage {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<OntologyError> for FfiError {
    fn from(e: OntologyError) -> Self {
        match e {
            OntologyError::InvalidMessage { field, reason } => {
                FfiError::InvalidMessage { field, reason }
            }
            OntologyError::Json(e) => FfiError::Json(e),
        }
    }
}

/// Result type for boundary operations
pub type FfiResult<T> = Result<T, FfiError>;
