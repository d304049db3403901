//! Relay-layer errors.
//!
//! Every variant aborts the enclosing host-chain transaction; no partial
//! writes are ever observable. A failing downstream *callback* is
//! deliberately absent here: the SDP router logs it and moves on, because
//! the ordered slot is already spent (see `relay-sdp`).

use thiserror::Error;

use codec::CodecError;
use types::Identity;

use crate::auth::Role;

/// Errors raised by the AM and SDP routers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Any wire-format failure, including the AM version gate.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Caller identity absent from the registry the operation requires.
    #[error("caller {caller} does not hold role {role}")]
    Unauthorized { role: Role, caller: Identity },

    /// Delivered, rejected or forced sequence does not equal the channel's
    /// current expected value. The channel state is unchanged.
    #[error("sequence mismatch: channel expects {expected}, message carries {got}")]
    SequenceMismatch { expected: u32, got: u32 },

    /// The reserved unordered sentinel showed up where a ledger value was
    /// required.
    #[error("the unordered sentinel is not a valid ledger sequence")]
    SentinelSequence,

    /// No handler registered for the protocol type.
    #[error("no handler registered for protocol type {protocol_type}")]
    UnregisteredRoute { protocol_type: u32 },

    /// The identity is not a registered protocol handler.
    #[error("identity {identity} is not a registered protocol")]
    NotAProtocol { identity: Identity },

    /// Envelope addressed to some other domain.
    #[error("envelope addressed to domain {got:?}, local domain is {expected:?}")]
    DomainMismatch { expected: String, got: String },

    /// The external verifier returned a non-zero status for a notarized
    /// proof.
    #[error("attestation verifier rejected proof with status {code}")]
    VerifierRejected { code: u32 },

    /// A required piece of deployment configuration has not been set yet.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

pub type RelayResult<T> = std::result::Result<T, RelayError>;
