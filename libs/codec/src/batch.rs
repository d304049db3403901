//! Relayer submission framing.
//!
//! A batch is a forward sequence of `(hints, proof)` string pairs, each
//! prefixed by a 4-byte big-endian length. This is a third, simpler cursor
//! discipline next to the word and TLV codecs: forward, big-endian, no
//! alignment. After the final pair the cursor must land exactly on the end
//! of the buffer.

use crate::error::{CodecError, CodecResult};

/// Forward reader yielding `(hints, proof)` pairs.
pub struct BatchReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> BatchReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        BatchReader { buf, offset: 0 }
    }

    fn read_entry(&mut self) -> CodecResult<&'a [u8]> {
        if self.buf.len() - self.offset < 4 {
            return Err(CodecError::Truncated {
                need: self.offset + 4,
                got: self.buf.len(),
            });
        }
        let raw: [u8; 4] = self.buf[self.offset..self.offset + 4]
            .try_into()
            .expect("width checked");
        let len = u32::from_be_bytes(raw) as usize;
        self.offset += 4;
        if self.buf.len() - self.offset < len {
            return Err(CodecError::Truncated {
                need: self.offset + len,
                got: self.buf.len(),
            });
        }
        let value = &self.buf[self.offset..self.offset + len];
        self.offset += len;
        Ok(value)
    }

    /// Next `(hints, proof)` pair, or `None` once the cursor sits exactly
    /// on the buffer end. Any leftover bytes that cannot form a whole pair
    /// are a fatal truncation.
    pub fn next_pair(&mut self) -> CodecResult<Option<(&'a [u8], &'a [u8])>> {
        if self.offset == self.buf.len() {
            return Ok(None);
        }
        let hints = self.read_entry()?;
        let proof = self.read_entry()?;
        Ok(Some((hints, proof)))
    }
}

/// Builder producing the same framing, for relayer tooling and tests.
#[derive(Default)]
pub struct BatchWriter {
    buf: Vec<u8>,
}

impl BatchWriter {
    pub fn new() -> Self {
        BatchWriter::default()
    }

    pub fn push_pair(mut self, hints: &[u8], proof: &[u8]) -> Self {
        for part in [hints, proof] {
            self.buf.extend_from_slice(&(part.len() as u32).to_be_bytes());
            self.buf.extend_from_slice(part);
        }
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
