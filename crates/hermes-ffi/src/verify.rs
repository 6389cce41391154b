//! Round-trip verification
//!
//! Each check sends a domain value across the boundary, reads the answer
//! back and compares it with what was sent, field by field through
//! `PartialEq`. Floats must come back bit-for-bit; nothing is rounded.

use crate::engine::RoundTripKind;
use crate::error::{FfiError, FfiResult};
use crate::gateway::Gateway;
use hermes_ontology::{json, HermesMessage};

/// Convert to the flat form and straight back, without crossing the boundary
pub fn local_round_trip<K: RoundTripKind>(message: &K::Domain) -> FfiResult<K::Domain> {
    let flat = K::from_domain(message.clone())?;
    flat.to_domain()
}

/// Send a message through the engine's flat round trip and read the answer
///
/// The engine's output is destroyed before returning, whatever the outcome
/// of reading it back.
pub fn round_trip_flat<K: RoundTripKind>(
    gateway: &Gateway,
    message: &K::Domain,
) -> FfiResult<K::Domain> {
    let input = K::from_domain(message.clone())?;
    let output = gateway.round_trip(&input)?;
    let received = output.to_domain();
    let destroyed = output.destroy();
    let received = received?;
    destroyed?;
    Ok(received)
}

/// Send a message through the engine's JSON round trip and parse the answer
pub fn round_trip_json<M: HermesMessage>(gateway: &Gateway, message: &M) -> FfiResult<M> {
    let text = json::to_json(message)?;
    let output = gateway.round_trip_json::<M>(&text)?;
    let received = output.to_str().and_then(|s| Ok(json::from_json(s)?));
    let destroyed = output.destroy();
    let received = received?;
    destroyed?;
    Ok(received)
}

fn compare<M: HermesMessage>(sent: &M, received: M) -> FfiResult<M> {
    if *sent == received {
        Ok(received)
    } else {
        Err(FfiError::Mismatch {
            kind: M::KIND,
            sent: format!("{:?}", sent),
            received: format!("{:?}", received),
        })
    }
}

/// Flat round trip that fails with `Mismatch` unless the answer equals the input
pub fn check_flat<K: RoundTripKind>(
    gateway: &Gateway,
    message: &K::Domain,
) -> FfiResult<K::Domain> {
    let received = round_trip_flat::<K>(gateway, message)?;
    tracing::trace!(kind = <K::Domain as HermesMessage>::KIND, "flat round trip received");
    compare(message, received)
}

/// JSON round trip that fails with `Mismatch` unless the answer equals the input
pub fn check_json<M: HermesMessage>(gateway: &Gateway, message: &M) -> FfiResult<M> {
    let received = round_trip_json(gateway, message)?;
    compare(message, received)
}

/// Both encodings must round-trip the message, and agree with each other
pub fn check_parity<K: RoundTripKind>(gateway: &Gateway, message: &K::Domain) -> FfiResult<()> {
    let flat = check_flat::<K>(gateway, message)?;
    let text = check_json(gateway, message)?;
    compare(&flat, text)?;
    tracing::debug!(
        kind = <K::Domain as HermesMessage>::KIND,
        "flat and JSON round trips agree"
    );
    Ok(())
}
