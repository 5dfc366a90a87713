//! 8-bit indexed BMP decoding (`.bmp`)
//!
//! Only the uncompressed, 256-colour variant is accepted. Pixel indices are
//! resolved through the palette into packed RGBA8888 words and the image is
//! flipped from BMP's bottom-up row order into top-down order.
//!
//! # Layout
//! ```text
//! 0x00: magic "BM"
//! 0x0A: pixel_offset u32 LE
//! 0x0E: info_size u32 LE
//! 0x12: width i32 LE
//! 0x16: height i32 LE
//! 0x1A: planes u16 LE
//! 0x1C: bit_count u16 LE (must be 8)
//! 0x1E: compression u32 LE (must be 0)
//! 0x36: palette, 256 × (blue, green, red, reserved)
//! pixel_offset: width × height index bytes, bottom row first, no row padding
//! ```

use super::schema::Field;

/// Magic bytes at the start of every bitmap file
pub const BMP_MAGIC: &[u8; 2] = b"BM";

/// Smallest file accepted as a bitmap
pub const MIN_BMP_SIZE: usize = 64;

/// Palette immediately follows the 14-byte file header and 40-byte info header
pub const PALETTE_OFFSET: usize = 14 + 40;

pub const PALETTE_ENTRIES: usize = 256;

/// Bytes per palette record (blue, green, red, reserved)
pub const PALETTE_ENTRY_SIZE: usize = 4;

/// Header field schema, in file order.
pub mod fields {
    use super::Field;

    pub const MAGIC: Field = Field::new("magic", 0x00, 2);
    pub const PIXEL_OFFSET: Field = Field::new("pixel_offset", 0x0A, 4);
    pub const INFO_SIZE: Field = Field::new("info_size", 0x0E, 4);
    pub const WIDTH: Field = Field::new("width", 0x12, 4);
    pub const HEIGHT: Field = Field::new("height", 0x16, 4);
    pub const PLANES: Field = Field::new("planes", 0x1A, 2);
    pub const BIT_COUNT: Field = Field::new("bit_count", 0x1C, 2);
    pub const COMPRESSION: Field = Field::new("compression", 0x1E, 4);

    pub const ALL: [Field; 8] = [
        MAGIC,
        PIXEL_OFFSET,
        INFO_SIZE,
        WIDTH,
        HEIGHT,
        PLANES,
        BIT_COUNT,
        COMPRESSION,
    ];
}

/// Error type for bitmap decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitmapError {
    #[error("invalid file format (file is {size} bytes, need at least {MIN_BMP_SIZE})")]
    TooSmall { size: usize },

    #[error("invalid file format (BM)")]
    BadMagic,

    #[error("invalid file format (header field `{0}` is out of range)")]
    TruncatedHeader(&'static str),

    #[error("invalid file format (not 8bit color mode: {0} bits per pixel)")]
    UnsupportedBitDepth(u16),

    #[error("invalid file format (not uncompressed: compression type {0})")]
    UnsupportedCompression(u32),

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error(
        "pixel data truncated (need {needed} bytes at offset {offset}, file has {available})"
    )]
    TruncatedPixels {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// Parsed bitmap header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    pub pixel_offset: u32,
    pub info_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
}

fn read_u16(buf: &[u8], field: Field) -> Result<u16, BitmapError> {
    field
        .read_u16(buf)
        .ok_or(BitmapError::TruncatedHeader(field.name))
}

fn read_u32(buf: &[u8], field: Field) -> Result<u32, BitmapError> {
    field
        .read_u32(buf)
        .ok_or(BitmapError::TruncatedHeader(field.name))
}

fn read_i32(buf: &[u8], field: Field) -> Result<i32, BitmapError> {
    field
        .read_i32(buf)
        .ok_or(BitmapError::TruncatedHeader(field.name))
}

impl BitmapHeader {
    /// Read and validate the header.
    ///
    /// Checks run in a fixed order (size, magic, bit depth, compression) so
    /// that a file failing several of them always reports the same error.
    pub fn parse(buf: &[u8]) -> Result<Self, BitmapError> {
        if buf.len() < MIN_BMP_SIZE {
            return Err(BitmapError::TooSmall { size: buf.len() });
        }
        if fields::MAGIC.bytes(buf) != Some(&BMP_MAGIC[..]) {
            return Err(BitmapError::BadMagic);
        }

        let header = Self {
            pixel_offset: read_u32(buf, fields::PIXEL_OFFSET)?,
            info_size: read_u32(buf, fields::INFO_SIZE)?,
            width: read_i32(buf, fields::WIDTH)?,
            height: read_i32(buf, fields::HEIGHT)?,
            planes: read_u16(buf, fields::PLANES)?,
            bit_count: read_u16(buf, fields::BIT_COUNT)?,
            compression: read_u32(buf, fields::COMPRESSION)?,
        };

        if header.bit_count != 8 {
            return Err(BitmapError::UnsupportedBitDepth(header.bit_count));
        }
        if header.compression != 0 {
            return Err(BitmapError::UnsupportedCompression(header.compression));
        }
        if header.width <= 0 || header.height <= 0 {
            return Err(BitmapError::InvalidDimensions {
                width: header.width,
                height: header.height,
            });
        }

        Ok(header)
    }

    /// Number of pixels, or `None` on overflow.
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }
}

/// 256-entry colour table resolved to packed `R<<24 | G<<16 | B<<8` words.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [u32; PALETTE_ENTRIES],
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("entries", &PALETTE_ENTRIES)
            .finish()
    }
}

impl Palette {
    /// Pack one palette record. The low byte is always zero.
    pub fn pack_entry(blue: u8, green: u8, red: u8) -> u32 {
        (red as u32) << 24 | (green as u32) << 16 | (blue as u32) << 8
    }

    /// Read the palette that follows the info header.
    ///
    /// Records that run past the end of the buffer resolve to colour 0.
    pub fn from_bmp(buf: &[u8]) -> Self {
        let mut colors = [0u32; PALETTE_ENTRIES];
        for (i, color) in colors.iter_mut().enumerate() {
            let start = PALETTE_OFFSET + i * PALETTE_ENTRY_SIZE;
            if let Some(entry) = buf.get(start..start + 3) {
                *color = Self::pack_entry(entry[0], entry[1], entry[2]);
            }
        }
        Self { colors }
    }

    pub fn get(&self, index: u8) -> u32 {
        self.colors[index as usize]
    }
}

/// Decoded image: packed colours, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelTable {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

/// A validated 8-bit bitmap borrowing its index plane from the file buffer.
#[derive(Debug, Clone)]
pub struct IndexedBitmap<'a> {
    pub header: BitmapHeader,
    pub palette: Palette,
    indices: &'a [u8],
}

impl<'a> IndexedBitmap<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<Self, BitmapError> {
        let header = BitmapHeader::parse(buf)?;
        let offset = header.pixel_offset as usize;
        let needed = header
            .pixel_count()
            .ok_or(BitmapError::InvalidDimensions {
                width: header.width,
                height: header.height,
            })?;
        let truncated = BitmapError::TruncatedPixels {
            offset,
            needed,
            available: buf.len(),
        };
        let end = offset.checked_add(needed).ok_or(truncated.clone())?;
        let indices = buf.get(offset..end).ok_or(truncated)?;

        tracing::debug!(
            "Bitmap {}x{}, {} bpp, pixel data at 0x{:X}",
            header.width,
            header.height,
            header.bit_count,
            offset
        );

        Ok(Self {
            header,
            palette: Palette::from_bmp(buf),
            indices,
        })
    }

    pub fn width(&self) -> usize {
        self.header.width as usize
    }

    pub fn height(&self) -> usize {
        self.header.height as usize
    }

    /// Resolve every index through the palette, flipping rows to top-down.
    pub fn to_pixel_table(&self) -> PixelTable {
        let width = self.width();
        let height = self.height();
        let mut pixels = Vec::with_capacity(width * height);
        for row in self.indices.chunks_exact(width).rev() {
            pixels.extend(row.iter().map(|&index| self.palette.get(index)));
        }
        PixelTable {
            width: width as u32,
            height: height as u32,
            pixels,
        }
    }
}

/// Decode an 8-bit uncompressed BMP file image into a top-down pixel table.
pub fn decode_indexed_bmp(buf: &[u8]) -> Result<PixelTable, BitmapError> {
    Ok(IndexedBitmap::parse(buf)?.to_pixel_table())
}

/// Build an 8-bit BMP file image in memory.
///
/// `palette` holds raw 32-bit palette words (`0x00RRGGBB`, stored little-endian
/// as blue, green, red, reserved); missing entries are zero. `rows` are given
/// bottom row first, as stored on disk.
#[cfg(any(test, feature = "test-utils"))]
pub fn build_test_bmp(width: i32, height: i32, palette: &[u32], rows: &[&[u8]]) -> Vec<u8> {
    let pixel_offset = PALETTE_OFFSET + PALETTE_ENTRIES * PALETTE_ENTRY_SIZE;
    let mut buf = vec![0u8; pixel_offset];
    buf[0..2].copy_from_slice(BMP_MAGIC);
    buf[0x0A..0x0E].copy_from_slice(&(pixel_offset as u32).to_le_bytes());
    buf[0x0E..0x12].copy_from_slice(&40u32.to_le_bytes());
    buf[0x12..0x16].copy_from_slice(&width.to_le_bytes());
    buf[0x16..0x1A].copy_from_slice(&height.to_le_bytes());
    buf[0x1A..0x1C].copy_from_slice(&1u16.to_le_bytes());
    buf[0x1C..0x1E].copy_from_slice(&8u16.to_le_bytes());
    for (i, word) in palette.iter().enumerate() {
        let start = PALETTE_OFFSET + i * PALETTE_ENTRY_SIZE;
        buf[start..start + 4].copy_from_slice(&word.to_le_bytes());
    }
    for row in rows {
        buf.extend_from_slice(row);
    }
    let file_size = buf.len() as u32;
    buf[0x02..0x06].copy_from_slice(&file_size.to_le_bytes());
    buf
}
