//! # Lattice Protocol Codec
//!
//! ## Purpose
//!
//! This crate contains the "rules" layer of the bridge: every byte layout
//! that crosses a chain boundary, and nothing that routes or stores. Two
//! unrelated encodings coexist here on purpose:
//!
//! - **Word layout** ([`words`], [`envelope`]): fixed fields packed
//!   right-aligned into 32-byte blocks, written and read *backward* from a
//!   cursor that starts at the end of a pre-sized buffer. Scalars are
//!   big-endian. This is the log-style format AM packages and SDP envelopes
//!   use.
//! - **TLV** ([`tlv`], [`proof`]): forward-scanned tag-length-value records
//!   with *little-endian* tags and lengths, used by the relayer proof
//!   envelopes.
//!
//! The two grew up on opposite sides of the bridge and stay bit-exact with
//! their ancestors; do not try to unify them.
//!
//! ## What This Crate Contains
//! - `WordWriter`/`WordReader` and the 32-byte-block string layout
//! - AM package and SDP envelope encode/decode
//! - TLV packets, the oracle and notary proof shapes, [`proof::ProofEnvelope`]
//! - Relayer batch framing ([`batch`])
//!
//! ## What This Crate Does NOT Contain
//! - Sequencing, registries, authorization (`relay-*` crates)
//! - Transport or storage of any kind

pub mod batch;
pub mod envelope;
pub mod error;
pub mod proof;
pub mod tlv;
pub mod words;

pub use batch::{BatchReader, BatchWriter};
pub use envelope::{
    decode_am_packet, decode_sdp_envelope, encode_am_packet, encode_sdp_envelope,
};
pub use error::{CodecError, CodecResult};
pub use proof::{CrossChainChannel, CrossChainLane, NotaryProof, OracleProof, ProofEnvelope};
pub use tlv::{read_u16_le, read_u32_le, TlvItem, TlvPacket};
pub use words::{reserved_for_str, WordReader, WordWriter};
