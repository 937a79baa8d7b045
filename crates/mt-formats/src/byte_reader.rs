//! Fixed-offset field extraction over an immutable buffer.

use crate::FormatError;

/// Big-endian, bounds-checked reads at absolute offsets.
///
/// The reader holds no cursor; every read names its offset.
#[derive(Clone, Copy, Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `len` bytes starting at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], FormatError> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(FormatError::UnexpectedEof {
                offset,
                needed: len,
                len: self.data.len(),
            })
    }

    /// Bytes from `offset` to the end of the buffer (empty past the end).
    pub fn tail(&self, offset: usize) -> &'a [u8] {
        self.data.get(offset..).unwrap_or(&[])
    }

    pub fn u8(&self, offset: usize) -> Result<u8, FormatError> {
        Ok(self.bytes(offset, 1)?[0])
    }

    pub fn u16_be(&self, offset: usize) -> Result<u16, FormatError> {
        let b = self.bytes(offset, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(offset, N)?);
        Ok(out)
    }

    /// Printable ASCII (0x20..=0x7E) from a fixed-width field, other bytes
    /// dropped, surrounding whitespace trimmed.
    pub fn ascii(&self, offset: usize, len: usize) -> Result<String, FormatError> {
        let text: String = self
            .bytes(offset, len)?
            .iter()
            .filter(|b| (0x20..=0x7E).contains(*b))
            .map(|&b| b as char)
            .collect();
        Ok(text.trim().to_string())
    }
}
