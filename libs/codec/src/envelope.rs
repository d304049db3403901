//! AM package and SDP envelope layouts over the word codec.
//!
//! Field order is fixed and the variable-length payload always sits lowest,
//! because the backward cursor needs the fixed-width fields at known
//! distances from the top of the buffer. Both decoders demand the cursor
//! land exactly on zero so a truncated or padded buffer can never yield a
//! value.

use types::{AmPacket, SdpEnvelope, AM_VERSION, IDENTITY_LEN};

use crate::error::{CodecError, CodecResult};
use crate::words::{reserved_for_str, WordReader, WordWriter};

/// Encode an AM package: version, sender identity, protocol type, payload.
pub fn encode_am_packet(packet: &AmPacket) -> CodecResult<Vec<u8>> {
    let size = 4 + IDENTITY_LEN + 4 + reserved_for_str(packet.payload.len());
    let mut w = WordWriter::new(size);
    w.write_u32(packet.version)?;
    w.write_identity(&packet.sender)?;
    w.write_u32(packet.protocol_type)?;
    w.write_str(&packet.payload)?;
    w.finish()
}

/// Decode an AM package. Rejects any version other than [`AM_VERSION`]
/// before touching the rest of the buffer; this is the wire-evolution gate.
pub fn decode_am_packet(buf: &[u8]) -> CodecResult<AmPacket> {
    let mut r = WordReader::new(buf);
    let version = r.read_u32()?;
    if version != AM_VERSION {
        return Err(CodecError::Version { got: version });
    }
    let sender = r.read_identity()?;
    let protocol_type = r.read_u32()?;
    let payload = r.read_str()?;
    r.expect_consumed()?;
    Ok(AmPacket {
        version,
        sender,
        protocol_type,
        payload,
    })
}

/// Encode an SDP envelope: receiver domain, receiver identity, sequence,
/// payload.
pub fn encode_sdp_envelope(envelope: &SdpEnvelope) -> CodecResult<Vec<u8>> {
    let size = reserved_for_str(envelope.receiver_domain.len())
        + IDENTITY_LEN
        + 4
        + reserved_for_str(envelope.payload.len());
    let mut w = WordWriter::new(size);
    w.write_str(envelope.receiver_domain.as_bytes())?;
    w.write_identity(&envelope.receiver)?;
    w.write_u32(envelope.sequence)?;
    w.write_str(&envelope.payload)?;
    w.finish()
}

/// Decode an SDP envelope. Matching the receiver domain against the local
/// domain is the router's job, not the codec's.
pub fn decode_sdp_envelope(buf: &[u8]) -> CodecResult<SdpEnvelope> {
    let mut r = WordReader::new(buf);
    let receiver_domain =
        String::from_utf8(r.read_str()?).map_err(|_| CodecError::InvalidDomain)?;
    let receiver = r.read_identity()?;
    let sequence = r.read_u32()?;
    let payload = r.read_str()?;
    r.expect_consumed()?;
    Ok(SdpEnvelope {
        receiver_domain,
        receiver,
        sequence,
        payload,
    })
}
