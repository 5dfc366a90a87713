//! Explicit header schemas for little-endian binary formats.
//!
//! Headers are described as ordered lists of [`Field`]s and read by slicing at
//! the declared offset. Nothing is ever overlaid onto a `#[repr(C)]` struct, so
//! alignment and padding never leak into the on-disk layout.

/// A single little-endian header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, used in diagnostics
    pub name: &'static str,
    /// Byte offset from the start of the buffer
    pub offset: usize,
    /// Width in bytes (1, 2 or 4)
    pub width: usize,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, width: usize) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    /// One past the last byte this field occupies.
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    /// Borrow the raw bytes of this field, or `None` if the buffer is too short.
    pub fn bytes<'a>(&self, buf: &'a [u8]) -> Option<&'a [u8]> {
        buf.get(self.offset..self.end())
    }

    pub fn read_u16(&self, buf: &[u8]) -> Option<u16> {
        debug_assert_eq!(self.width, 2, "{} is not a 16-bit field", self.name);
        let b = self.bytes(buf)?;
        Some(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&self, buf: &[u8]) -> Option<u32> {
        debug_assert_eq!(self.width, 4, "{} is not a 32-bit field", self.name);
        let b = self.bytes(buf)?;
        Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32(&self, buf: &[u8]) -> Option<i32> {
        debug_assert_eq!(self.width, 4, "{} is not a 32-bit field", self.name);
        let b = self.bytes(buf)?;
        Some(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// Sequential little-endian reader over a borrowed buffer.
///
/// Every read is bounds-checked; a short buffer yields `None` and leaves the
/// cursor where it was.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Take the next `len` bytes as a sub-slice of the original buffer.
    pub fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let slice = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    pub fn read_i32_le(&mut self) -> Option<i32> {
        let b = self.take(4)?;
        Some(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}
