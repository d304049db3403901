//! Collaborator ports.
//!
//! The bridge runs inside a host chain that already provides cross-contract
//! calls, an event log and (for notarized proofs) an attestation verifier
//! hub. These traits are those collaborators at the seam; the routers never
//! see anything more concrete.

use types::{CallStatus, Identity};

use crate::error::RelayResult;

/// An event emitted into the host chain's log for off-chain relayers to
/// observe. Emission is the only "delivery" the outbound path performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEvent {
    pub name: &'static str,
    pub payload: Vec<u8>,
}

/// The host chain's event-log emission primitive.
pub trait EventSink {
    fn emit(&mut self, event: OutboundEvent);
}

/// Vec-backed [`EventSink`] for tests and embedders that poll in-process.
#[derive(Debug, Default)]
pub struct RecordedEvents {
    pub events: Vec<OutboundEvent>,
}

impl EventSink for RecordedEvents {
    fn emit(&mut self, event: OutboundEvent) {
        self.events.push(event);
    }
}

/// Synchronous cross-contract calls into receiving business contracts, as
/// the SDP router sees them. The two callbacks are the whole surface this
/// design guarantees anything about: *when* they run and in *what order*,
/// never what they do.
pub trait ContractBus {
    fn on_ordered_message(
        &mut self,
        receiver: &Identity,
        sender_domain: &str,
        sender: &Identity,
        message: &[u8],
    ) -> CallStatus;

    fn on_unordered_message(
        &mut self,
        receiver: &Identity,
        sender_domain: &str,
        sender: &Identity,
        message: &[u8],
    ) -> CallStatus;
}

/// AM-side dispatch of a decoded message to a registered protocol handler.
/// In a deployment this is a cross-contract call into the handler's inbound
/// endpoint (the SDP router's `receive`, for the session protocol).
pub trait ProtocolSink {
    fn deliver(
        &mut self,
        handler: &Identity,
        sender_domain: &str,
        sender: &Identity,
        message: &[u8],
    ) -> RelayResult<()>;
}

/// The external attestation verifier hub. Zero means the proof checks out;
/// any other status is a fatal verification failure. The cryptography
/// behind it is entirely out of scope.
pub trait AttestationVerifier {
    fn verify_attestation(&self, raw_proof: &[u8]) -> u32;
}

/// Verifier that accepts everything; the binding for trusted submission
/// paths and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl AttestationVerifier for AcceptAll {
    fn verify_attestation(&self, _raw_proof: &[u8]) -> u32 {
        0
    }
}
