//! Right-aligned 32-byte-word layout, backward cursor.
//!
//! Fields are written and read in reverse declaration order: the cursor
//! starts one byte past the end of the region not yet touched and each call
//! consumes exactly its field's width moving toward zero. Scalars are
//! big-endian. Variable-length strings take a 32-byte length slot (28 zero
//! bytes, then the length as a big-endian u32 at the high end) followed
//! below by `ceil(len/32)` content blocks: the string's *first* 32-byte
//! chunk sits in the highest block, and the final partial chunk is
//! left-aligned in its block with zero padding on the right.
//!
//! Callers pre-size buffers exactly (see [`reserved_for_str`]) and a whole
//! structure must land the cursor on zero; anything else is a fatal
//! [`CodecError`].

use types::{Identity, IDENTITY_LEN, WORD};

use crate::error::{CodecError, CodecResult};

/// Bytes reserved for a string of `len` bytes: the 32-byte length slot plus
/// one 32-byte block per started chunk of content. An empty string still
/// takes its length slot.
pub const fn reserved_for_str(len: usize) -> usize {
    let blocks = if len == 0 { 0 } else { (len - 1) / WORD + 1 };
    (blocks + 1) * WORD
}

/// Backward writer over a pre-sized, zero-initialized buffer.
pub struct WordWriter {
    buf: Vec<u8>,
    cursor: usize,
}

impl WordWriter {
    /// Buffer of exactly `size` zero bytes, cursor at the end.
    pub fn new(size: usize) -> Self {
        WordWriter {
            buf: vec![0u8; size],
            cursor: size,
        }
    }

    /// Claim `width` bytes below the cursor, returning their start offset.
    fn claim(&mut self, width: usize) -> CodecResult<usize> {
        debug_assert!(self.cursor <= self.buf.len());
        if width > self.cursor {
            return Err(CodecError::Bounds {
                need: width,
                cursor: self.cursor,
            });
        }
        self.cursor -= width;
        Ok(self.cursor)
    }

    pub fn write_u32(&mut self, value: u32) -> CodecResult<()> {
        let at = self.claim(4)?;
        self.buf[at..at + 4].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> CodecResult<()> {
        let at = self.claim(8)?;
        self.buf[at..at + 8].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn write_identity(&mut self, id: &Identity) -> CodecResult<()> {
        let at = self.claim(IDENTITY_LEN)?;
        self.buf[at..at + IDENTITY_LEN].copy_from_slice(id.as_bytes());
        Ok(())
    }

    /// Length slot first (highest addresses of the region), then content
    /// blocks downward with the first chunk in the highest block.
    pub fn write_str(&mut self, s: &[u8]) -> CodecResult<()> {
        let len = s.len();
        let len32 =
            u32::try_from(len).map_err(|_| CodecError::Truncated { need: len, got: u32::MAX as usize })?;

        let at = self.claim(4)?;
        self.buf[at..at + 4].copy_from_slice(&len32.to_be_bytes());
        let pad = self.claim(WORD - 4)?;
        self.buf[pad..pad + (WORD - 4)].fill(0);

        for chunk in s.chunks(WORD) {
            let at = self.claim(WORD)?;
            self.buf[at..at + chunk.len()].copy_from_slice(chunk);
            self.buf[at + chunk.len()..at + WORD].fill(0);
        }
        Ok(())
    }

    /// Consume the writer; the cursor must sit exactly at zero.
    pub fn finish(self) -> CodecResult<Vec<u8>> {
        if self.cursor != 0 {
            return Err(CodecError::TrailingBytes {
                remaining: self.cursor,
            });
        }
        Ok(self.buf)
    }
}

/// Backward reader mirroring [`WordWriter`].
pub struct WordReader<'a> {
    buf: &'a [u8],
    cursor: usize,
}

impl<'a> WordReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        WordReader {
            buf,
            cursor: buf.len(),
        }
    }

    fn claim(&mut self, width: usize) -> CodecResult<usize> {
        debug_assert!(self.cursor <= self.buf.len());
        if width > self.cursor {
            return Err(CodecError::Bounds {
                need: width,
                cursor: self.cursor,
            });
        }
        self.cursor -= width;
        Ok(self.cursor)
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        let at = self.claim(4)?;
        let raw: [u8; 4] = self.buf[at..at + 4].try_into().expect("claimed width");
        Ok(u32::from_be_bytes(raw))
    }

    pub fn read_u64(&mut self) -> CodecResult<u64> {
        let at = self.claim(8)?;
        let raw: [u8; 8] = self.buf[at..at + 8].try_into().expect("claimed width");
        Ok(u64::from_be_bytes(raw))
    }

    pub fn read_identity(&mut self) -> CodecResult<Identity> {
        let at = self.claim(IDENTITY_LEN)?;
        let raw: [u8; IDENTITY_LEN] =
            self.buf[at..at + IDENTITY_LEN].try_into().expect("claimed width");
        Ok(Identity::from_bytes(raw))
    }

    pub fn read_str(&mut self) -> CodecResult<Vec<u8>> {
        let at = self.claim(4)?;
        let raw: [u8; 4] = self.buf[at..at + 4].try_into().expect("claimed width");
        let len = u32::from_be_bytes(raw) as usize;
        self.claim(WORD - 4)?;

        // The content blocks must fit below the slot we just consumed.
        let blocks = if len == 0 { 0 } else { (len - 1) / WORD + 1 };
        if blocks * WORD > self.cursor {
            return Err(CodecError::Bounds {
                need: blocks * WORD,
                cursor: self.cursor,
            });
        }

        let mut out = vec![0u8; len];
        let mut written = 0usize;
        while written < len {
            let take = (len - written).min(WORD);
            let at = self.claim(WORD)?;
            out[written..written + take].copy_from_slice(&self.buf[at..at + take]);
            written += take;
        }
        Ok(out)
    }

    /// Bytes still unread below the cursor.
    pub fn remaining(&self) -> usize {
        self.cursor
    }

    /// A whole-structure decode must end here with the cursor on zero.
    pub fn expect_consumed(&self) -> CodecResult<()> {
        if self.cursor != 0 {
            return Err(CodecError::TrailingBytes {
                remaining: self.cursor,
            });
        }
        Ok(())
    }
}
