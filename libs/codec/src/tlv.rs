//! Little-endian tag-length-value packets, forward cursor.
//!
//! The proof side of the bridge speaks this format: a 2-byte little-endian
//! version, a 4-byte little-endian body length, then records of tag (u16 LE),
//! length (u32 LE) and value. Note the endianness is the opposite of the
//! word codec's; the two encodings evolved independently and are kept
//! strictly apart.

use crate::error::{CodecError, CodecResult};

/// Packet header width: version (2) + body length (4).
const HEADER_LEN: usize = 6;

/// Record header width: tag (2) + length (4).
const ITEM_HEADER_LEN: usize = 6;

/// Read a little-endian u16 at `offset`.
pub fn read_u16_le(buf: &[u8], offset: usize) -> CodecResult<u16> {
    let end = offset.checked_add(2).ok_or(CodecError::Truncated {
        need: usize::MAX,
        got: buf.len(),
    })?;
    if end > buf.len() {
        return Err(CodecError::Truncated {
            need: end,
            got: buf.len(),
        });
    }
    Ok(u16::from_le_bytes([buf[offset], buf[offset + 1]]))
}

/// Read a little-endian u32 at `offset`.
pub fn read_u32_le(buf: &[u8], offset: usize) -> CodecResult<u32> {
    let end = offset.checked_add(4).ok_or(CodecError::Truncated {
        need: usize::MAX,
        got: buf.len(),
    })?;
    if end > buf.len() {
        return Err(CodecError::Truncated {
            need: end,
            got: buf.len(),
        });
    }
    Ok(u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ]))
}

/// One tag-length-value record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvItem {
    pub tag: u16,
    pub value: Vec<u8>,
}

impl TlvItem {
    pub fn new(tag: u16, value: impl Into<Vec<u8>>) -> Self {
        TlvItem {
            tag,
            value: value.into(),
        }
    }
}

/// A decoded TLV packet: version plus its records in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvPacket {
    pub version: u16,
    items: Vec<TlvItem>,
}

impl TlvPacket {
    pub fn new(version: u16, items: Vec<TlvItem>) -> Self {
        TlvPacket { version, items }
    }

    /// Decode a whole packet. Fails without partial output when the header
    /// is short, the declared body length disagrees with the buffer, or any
    /// record overruns it.
    pub fn decode(buf: &[u8]) -> CodecResult<Self> {
        if buf.len() < HEADER_LEN {
            return Err(CodecError::Truncated {
                need: HEADER_LEN,
                got: buf.len(),
            });
        }
        let version = read_u16_le(buf, 0)?;
        let body_len = read_u32_le(buf, 2)? as usize;
        if body_len != buf.len() - HEADER_LEN {
            return Err(CodecError::Truncated {
                need: HEADER_LEN + body_len,
                got: buf.len(),
            });
        }

        let mut items = Vec::new();
        let mut offset = HEADER_LEN;
        while offset < buf.len() {
            if buf.len() - offset < ITEM_HEADER_LEN {
                return Err(CodecError::Truncated {
                    need: offset + ITEM_HEADER_LEN,
                    got: buf.len(),
                });
            }
            let tag = read_u16_le(buf, offset)?;
            let len = read_u32_le(buf, offset + 2)? as usize;
            offset += ITEM_HEADER_LEN;
            if buf.len() - offset < len {
                return Err(CodecError::Truncated {
                    need: offset + len,
                    got: buf.len(),
                });
            }
            items.push(TlvItem {
                tag,
                value: buf[offset..offset + len].to_vec(),
            });
            offset += len;
        }
        Ok(TlvPacket { version, items })
    }

    pub fn encode(&self) -> Vec<u8> {
        let body_len: usize = self
            .items
            .iter()
            .map(|i| ITEM_HEADER_LEN + i.value.len())
            .sum();
        let mut out = Vec::with_capacity(HEADER_LEN + body_len);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&(body_len as u32).to_le_bytes());
        for item in &self.items {
            out.extend_from_slice(&item.tag.to_le_bytes());
            out.extend_from_slice(&(item.value.len() as u32).to_le_bytes());
            out.extend_from_slice(&item.value);
        }
        out
    }

    /// First record carrying `tag`, if any.
    pub fn find(&self, tag: u16) -> Option<&TlvItem> {
        self.items.iter().find(|i| i.tag == tag)
    }

    pub fn items(&self) -> &[TlvItem] {
        &self.items
    }
}
