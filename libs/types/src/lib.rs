//! # Lattice Types Library
//!
//! ## Purpose
//!
//! Pure data definitions shared by every Lattice crate: chain identities,
//! channel keys, the two message shapes that cross the bridge, and the wire
//! constants both codecs agree on.
//!
//! ## What This Crate Contains
//! - **Identity**: 32-byte opaque account/contract identifier
//! - **ChannelKey**: digest naming one directed ordered channel
//! - **AmPacket / SdpEnvelope**: the AM-layer and SDP-layer message shapes
//! - **CallStatus**: result of a synchronous cross-contract call
//! - Protocol constants (`AM_VERSION`, `UNORDERED_SEQUENCE`, block sizes)
//!
//! ## What This Crate Does NOT Contain
//! - Encoding/decoding rules (those live in `codec`)
//! - Routing, sequencing or storage logic (`relay-*` crates)

pub mod channel;
pub mod identity;
pub mod messages;

pub use channel::ChannelKey;
pub use identity::{Identity, IdentityError};
pub use messages::{AmPacket, CallStatus, SdpEnvelope};

/// Byte width of an [`Identity`].
pub const IDENTITY_LEN: usize = 32;

/// Block size of the right-aligned word codec. Every variable-length field
/// is padded out to a multiple of this.
pub const WORD: usize = 32;

/// AM package format version accepted and produced by this deployment.
pub const AM_VERSION: u32 = 1;

/// Sentinel sequence number marking an unordered message. Never a valid
/// ledger value; envelopes carrying it bypass the sequence ledger entirely.
pub const UNORDERED_SEQUENCE: u32 = 0xFFFF_FFFF;
