//! Message shapes crossing the bridge.
//!
//! Two layers, two shapes. The AM layer wraps everything a relayer moves
//! between chains in an [`AmPacket`]; the SDP layer's [`SdpEnvelope`] rides
//! inside the packet payload and carries the per-channel sequencing state.
//! Wire layouts for both live in the `codec` crate.

use crate::{Identity, AM_VERSION, UNORDERED_SEQUENCE};

/// One authentication-message package: the unit the AM router receives from
/// a decoded proof and forwards to a protocol handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmPacket {
    /// Format version; this deployment only produces and accepts 1.
    pub version: u32,
    /// Identity of the protocol contract that sent the payload.
    pub sender: Identity,
    /// Routing tag selecting the registered protocol handler.
    pub protocol_type: u32,
    /// Opaque upper-layer message, an SDP envelope in practice.
    pub payload: Vec<u8>,
}

impl AmPacket {
    pub fn new(sender: Identity, protocol_type: u32, payload: Vec<u8>) -> Self {
        AmPacket {
            version: AM_VERSION,
            sender,
            protocol_type,
            payload,
        }
    }
}

/// One session envelope: receiver coordinates, sequence slot and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdpEnvelope {
    /// Domain the envelope is addressed to; checked against the receiving
    /// node's configured local domain.
    pub receiver_domain: String,
    /// Receiving business contract.
    pub receiver: Identity,
    /// Channel sequence slot, or [`UNORDERED_SEQUENCE`].
    pub sequence: u32,
    /// Opaque business message.
    pub payload: Vec<u8>,
}

impl SdpEnvelope {
    pub fn is_unordered(&self) -> bool {
        self.sequence == UNORDERED_SEQUENCE
    }
}

/// Result of a synchronous cross-contract call made through the host chain.
/// Zero means success; anything else is the callee's error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStatus {
    pub code: u32,
    pub message: String,
}

impl CallStatus {
    pub fn ok() -> Self {
        CallStatus {
            code: 0,
            message: String::new(),
        }
    }

    pub fn error(code: u32, message: impl Into<String>) -> Self {
        CallStatus {
            code,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}
