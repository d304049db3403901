//! Relayer proof envelopes.
//!
//! A relayer submission carries attestations in one of two TLV shapes. The
//! legacy shape came from the oracle service: flat records holding request,
//! response body, error pair, sender domain and version, with the forwarded
//! message buried in a length-prefixed sub-region of the response body. The
//! notary shape wraps a third-party attestation: a nested cross-chain lane
//! record, a double-encoded response body, and the raw sub-proof handed to
//! the external verifier.
//!
//! [`ProofEnvelope`] is the explicit sum over the two. Shape selection
//! follows the ancestor contracts: a non-empty raw-proof record means
//! notarized, anything else falls back to legacy. That conflates "field
//! absent" with "old format" and is kept as a compatibility shim, not an
//! extension point.

use num_enum::TryFromPrimitive;

use types::Identity;

use crate::error::{CodecError, CodecResult};
use crate::tlv::{read_u32_le, TlvPacket};

/// Record tags of the legacy oracle proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u16)]
pub enum OracleTag {
    PubkeyHash = 0,
    RequestId = 1,
    RequestBody = 2,
    SignatureType = 3,
    Request = 4,
    ResponseBody = 5,
    ResponseSignature = 6,
    ErrorCode = 7,
    ErrorMsg = 8,
    SenderDomain = 9,
    Version = 10,
}

/// Record tags specific to the notarized proof. Oracle tags 0..=9 are
/// reused inside the same packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u16)]
pub enum NotaryTag {
    TpBtaVersion = 0x0100,
    CrossChainLane = 0x0101,
    RawProof = 0x01FF,
}

/// Tags of the nested cross-chain channel record.
const CHANNEL_TAG_SENDER_DOMAIN: u16 = 0;
const CHANNEL_TAG_RECEIVER_DOMAIN: u16 = 1;

/// Tags of the nested cross-chain lane record.
const LANE_TAG_CHANNEL: u16 = 0;
const LANE_TAG_SENDER_ID: u16 = 1;
const LANE_TAG_RECEIVER_ID: u16 = 2;

/// Tag of the actual body inside a double-encoded notary response.
const NOTARY_RESP_TAG_BODY: u16 = 0;

/// Byte offset of the little-endian payload length inside a legacy
/// response body; the payload itself starts at 12.
const LEGACY_RESP_LEN_AT: usize = 8;
const LEGACY_RESP_PAYLOAD_AT: usize = 12;

fn domain_from(value: &[u8]) -> CodecResult<String> {
    String::from_utf8(value.to_vec()).map_err(|_| CodecError::InvalidDomain)
}

fn identity_from(value: &[u8]) -> CodecResult<Identity> {
    Identity::from_slice(value).map_err(|_| CodecError::FieldWidth {
        expected: types::IDENTITY_LEN,
        got: value.len(),
    })
}

/// The request the oracle answered, nested TLV inside the Request record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OracleRequest {
    pub request_id: Vec<u8>,
    pub body: Vec<u8>,
}

impl OracleRequest {
    fn decode(raw: &[u8]) -> CodecResult<Self> {
        let packet = TlvPacket::decode(raw)?;
        let mut req = OracleRequest::default();
        for item in packet.items() {
            match OracleTag::try_from(item.tag) {
                Ok(OracleTag::RequestId) => req.request_id = item.value.clone(),
                Ok(OracleTag::RequestBody) => req.body = item.value.clone(),
                _ => {}
            }
        }
        Ok(req)
    }
}

/// Legacy oracle proof, flat record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OracleProof {
    pub request: OracleRequest,
    pub response_body: Vec<u8>,
    pub error_code: u32,
    pub error_msg: Vec<u8>,
    pub sender_domain: String,
    pub version: u16,
}

impl OracleProof {
    fn from_packet(packet: &TlvPacket) -> CodecResult<Self> {
        let mut proof = OracleProof::default();
        for item in packet.items() {
            match OracleTag::try_from(item.tag) {
                Ok(OracleTag::Request) => proof.request = OracleRequest::decode(&item.value)?,
                Ok(OracleTag::ResponseBody) => proof.response_body = item.value.clone(),
                Ok(OracleTag::ErrorCode) => proof.error_code = read_u32_le(&item.value, 0)?,
                Ok(OracleTag::ErrorMsg) => proof.error_msg = item.value.clone(),
                Ok(OracleTag::SenderDomain) => proof.sender_domain = domain_from(&item.value)?,
                Ok(OracleTag::Version) => {
                    proof.version = crate::tlv::read_u16_le(&item.value, 0)?
                }
                _ => {}
            }
        }
        Ok(proof)
    }

    /// Forwarded message: bytes 8..12 of the response body hold a
    /// little-endian length `L`, the message is the region `[12, 12 + L)`.
    pub fn message(&self) -> CodecResult<Vec<u8>> {
        let body = &self.response_body;
        if body.len() <= LEGACY_RESP_PAYLOAD_AT {
            return Err(CodecError::MalformedProof(format!(
                "legacy response body too short: {} bytes",
                body.len()
            )));
        }
        let len = read_u32_le(body, LEGACY_RESP_LEN_AT)? as usize;
        if body.len() < LEGACY_RESP_PAYLOAD_AT + len {
            return Err(CodecError::MalformedProof(format!(
                "legacy response body declares {len} payload bytes, {} present",
                body.len() - LEGACY_RESP_PAYLOAD_AT
            )));
        }
        Ok(body[LEGACY_RESP_PAYLOAD_AT..LEGACY_RESP_PAYLOAD_AT + len].to_vec())
    }
}

/// Nested channel record of a notarized proof.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossChainChannel {
    pub sender_domain: String,
    pub receiver_domain: String,
}

impl CrossChainChannel {
    fn decode(raw: &[u8]) -> CodecResult<Self> {
        let packet = TlvPacket::decode(raw)?;
        let mut channel = CrossChainChannel::default();
        for item in packet.items() {
            match item.tag {
                CHANNEL_TAG_SENDER_DOMAIN => channel.sender_domain = domain_from(&item.value)?,
                CHANNEL_TAG_RECEIVER_DOMAIN => {
                    channel.receiver_domain = domain_from(&item.value)?
                }
                _ => {}
            }
        }
        Ok(channel)
    }
}

/// Nested lane record: the channel plus both endpoint identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossChainLane {
    pub channel: CrossChainChannel,
    pub sender_id: Identity,
    pub receiver_id: Identity,
}

impl Default for CrossChainLane {
    fn default() -> Self {
        CrossChainLane {
            channel: CrossChainChannel::default(),
            sender_id: Identity::ZERO,
            receiver_id: Identity::ZERO,
        }
    }
}

impl CrossChainLane {
    fn decode(raw: &[u8]) -> CodecResult<Self> {
        let packet = TlvPacket::decode(raw)?;
        let mut lane = CrossChainLane::default();
        for item in packet.items() {
            match item.tag {
                LANE_TAG_CHANNEL => lane.channel = CrossChainChannel::decode(&item.value)?,
                LANE_TAG_SENDER_ID => lane.sender_id = identity_from(&item.value)?,
                LANE_TAG_RECEIVER_ID => lane.receiver_id = identity_from(&item.value)?,
                _ => {}
            }
        }
        Ok(lane)
    }
}

/// Notarized third-party proof.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotaryProof {
    pub tpbta_version: u32,
    pub lane: CrossChainLane,
    /// Already-unwrapped inner body (the response record is double-encoded).
    pub response_body: Vec<u8>,
    /// Opaque sub-proof for the external verifier. Non-empty by
    /// construction; an empty one selects the legacy shape instead.
    pub raw_proof: Vec<u8>,
}

impl NotaryProof {
    fn from_packet(packet: &TlvPacket) -> CodecResult<Self> {
        let mut proof = NotaryProof::default();
        for item in packet.items() {
            if item.tag == OracleTag::ResponseBody as u16 {
                proof.response_body = Self::unwrap_response(&item.value)?;
            } else {
                match NotaryTag::try_from(item.tag) {
                    Ok(NotaryTag::TpBtaVersion) => {
                        proof.tpbta_version = read_u32_le(&item.value, 0)?
                    }
                    Ok(NotaryTag::CrossChainLane) => {
                        proof.lane = CrossChainLane::decode(&item.value)?
                    }
                    Ok(NotaryTag::RawProof) => proof.raw_proof = item.value.clone(),
                    Err(_) => {}
                }
            }
        }
        Ok(proof)
    }

    /// The response record's value is itself a TLV packet whose tag-0
    /// record holds the actual body.
    fn unwrap_response(raw: &[u8]) -> CodecResult<Vec<u8>> {
        let packet = TlvPacket::decode(raw)?;
        Ok(packet
            .find(NOTARY_RESP_TAG_BODY)
            .map(|i| i.value.clone())
            .unwrap_or_default())
    }
}

/// A decoded relayer proof, explicit over its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofEnvelope {
    Legacy(OracleProof),
    Notarized(NotaryProof),
}

impl ProofEnvelope {
    /// Parse one proof. A non-empty [`NotaryTag::RawProof`] record selects
    /// the notarized shape; otherwise the legacy decode path runs.
    pub fn decode(raw: &[u8]) -> CodecResult<Self> {
        let packet = TlvPacket::decode(raw)?;
        let notarized = packet
            .find(NotaryTag::RawProof as u16)
            .map(|item| !item.value.is_empty())
            .unwrap_or(false);
        if notarized {
            Ok(ProofEnvelope::Notarized(NotaryProof::from_packet(&packet)?))
        } else {
            Ok(ProofEnvelope::Legacy(OracleProof::from_packet(&packet)?))
        }
    }

    /// Domain the attested message originated on.
    pub fn sender_domain(&self) -> &str {
        match self {
            ProofEnvelope::Legacy(proof) => &proof.sender_domain,
            ProofEnvelope::Notarized(proof) => &proof.lane.channel.sender_domain,
        }
    }

    /// The forwarded AM package bytes.
    pub fn message(&self) -> CodecResult<Vec<u8>> {
        match self {
            ProofEnvelope::Legacy(proof) => proof.message(),
            ProofEnvelope::Notarized(proof) => Ok(proof.response_body.clone()),
        }
    }
}

/// Wrap a message the way the legacy oracle framed its response bodies:
/// an 8-byte header region, the little-endian payload length, then the
/// payload. Relayer tooling and tests build fixtures with this.
pub fn legacy_response_body(message: &[u8]) -> Vec<u8> {
    let mut body = vec![0u8; LEGACY_RESP_LEN_AT];
    body.extend_from_slice(&(message.len() as u32).to_le_bytes());
    body.extend_from_slice(message);
    body
}
