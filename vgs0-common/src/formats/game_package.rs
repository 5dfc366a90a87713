//! VGS0 game package format (`.pkg`)
//!
//! A game package bundles the program ROM with optional background music and
//! sound effect data. The frontend embeds it as `gamepkg` and hands each
//! segment to the console core at boot.
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Magic: "VGS0PKG\0" (8 bytes)                │
//! ├──────────────────────────────────────────────┤
//! │  rom_size: i32 LE   (>= 8200)                │
//! │  rom: rom_size bytes                         │
//! ├──────────────────────────────────────────────┤
//! │  bgm_size: i32 LE   (0 = no music)           │
//! │  bgm: bgm_size bytes                         │
//! ├──────────────────────────────────────────────┤
//! │  se_size: i32 LE    (0 = no sound effects)   │
//! │  se: se_size bytes                           │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! A zero-length BGM or SE segment means the segment is absent, not present
//! and empty: the frontend skips initialising that subsystem entirely.

use std::fmt;

use super::schema::ByteCursor;

/// Magic bytes at the start of every package
pub const PACKAGE_MAGIC: &[u8; 8] = b"VGS0PKG\0";

/// ROM header preceding the first program bank
const ROM_HEADER_SIZE: usize = 8;

/// Size of one program bank
const ROM_BANK_SIZE: usize = 8192;

/// Smallest ROM accepted: the header plus one bank
pub const MIN_ROM_SIZE: usize = ROM_HEADER_SIZE + ROM_BANK_SIZE;

/// Package segments, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Rom,
    Bgm,
    Se,
}

impl Segment {
    /// Name of the source file this segment is built from.
    pub fn file_name(self) -> &'static str {
        match self {
            Segment::Rom => "game.rom",
            Segment::Bgm => "bgm.dat",
            Segment::Se => "se.dat",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Error type for package parsing and assembly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackageError {
    #[error("Invalid package (missing VGS0PKG magic)")]
    BadMagic,

    #[error("Invalid package ({segment} truncated: need {needed} bytes, {available} left)")]
    Truncated {
        segment: Segment,
        needed: usize,
        available: usize,
    },

    #[error("Invalid package ({segment} has negative size {size})")]
    NegativeSize { segment: Segment, size: i32 },

    #[error("Invalid game.rom size: {size} bytes (minimum {MIN_ROM_SIZE})")]
    RomTooSmall { size: usize },

    #[error("{segment} is too large for a package ({size} bytes)")]
    SegmentTooLarge { segment: Segment, size: usize },
}

/// A game package whose segments borrow from a caller-owned buffer.
///
/// Parsing never copies: the buffer must outlive every slice handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamePackage<'a> {
    pub rom: &'a [u8],
    pub bgm: Option<&'a [u8]>,
    pub se: Option<&'a [u8]>,
}

fn read_segment<'a>(
    cursor: &mut ByteCursor<'a>,
    segment: Segment,
) -> Result<&'a [u8], PackageError> {
    let size = cursor.read_i32_le().ok_or(PackageError::Truncated {
        segment,
        needed: 4,
        available: cursor.remaining(),
    })?;
    if size < 0 {
        return Err(PackageError::NegativeSize { segment, size });
    }
    let size = size as usize;
    if segment == Segment::Rom && size < MIN_ROM_SIZE {
        return Err(PackageError::RomTooSmall { size });
    }
    let available = cursor.remaining();
    let data = cursor.take(size).ok_or(PackageError::Truncated {
        segment,
        needed: size,
        available,
    })?;
    tracing::debug!("- {} size: {}", segment, size);
    Ok(data)
}

/// Segment sizes are stored as `i32`.
fn check_segment_len(segment: Segment, len: usize) -> Result<(), PackageError> {
    if i32::try_from(len).is_err() {
        return Err(PackageError::SegmentTooLarge { segment, size: len });
    }
    Ok(())
}

fn non_empty(data: &[u8]) -> Option<&[u8]> {
    if data.is_empty() { None } else { Some(data) }
}

impl<'a> GamePackage<'a> {
    /// Split a package buffer into its segments.
    ///
    /// The magic is compared before any length field is read. Bytes after the
    /// SE segment are ignored.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, PackageError> {
        if bytes.len() < PACKAGE_MAGIC.len() || &bytes[..PACKAGE_MAGIC.len()] != PACKAGE_MAGIC {
            return Err(PackageError::BadMagic);
        }

        let mut cursor = ByteCursor::new(&bytes[PACKAGE_MAGIC.len()..]);
        let rom = read_segment(&mut cursor, Segment::Rom)?;
        let bgm = read_segment(&mut cursor, Segment::Bgm)?;
        let se = read_segment(&mut cursor, Segment::Se)?;

        if cursor.remaining() > 0 {
            tracing::debug!("Ignoring {} trailing bytes", cursor.remaining());
        }

        Ok(Self {
            rom,
            bgm: non_empty(bgm),
            se: non_empty(se),
        })
    }

    fn segments(&self) -> [(Segment, &'a [u8]); 3] {
        [
            (Segment::Rom, self.rom),
            (Segment::Bgm, self.bgm.unwrap_or_default()),
            (Segment::Se, self.se.unwrap_or_default()),
        ]
    }

    /// Check the invariants a package must hold before it is written.
    pub fn validate(&self) -> Result<(), PackageError> {
        if self.rom.len() < MIN_ROM_SIZE {
            return Err(PackageError::RomTooSmall {
                size: self.rom.len(),
            });
        }
        for (segment, data) in self.segments() {
            check_segment_len(segment, data.len())?;
        }
        Ok(())
    }

    /// Total size of the encoded package in bytes.
    pub fn encoded_len(&self) -> usize {
        PACKAGE_MAGIC.len()
            + self
                .segments()
                .iter()
                .map(|(_, data)| 4 + data.len())
                .sum::<usize>()
    }

    /// Serialize to the package layout.
    ///
    /// An absent segment and an empty one encode identically (size 0).
    pub fn to_bytes(&self) -> Result<Vec<u8>, PackageError> {
        self.validate()?;
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(PACKAGE_MAGIC);
        for (_, data) in self.segments() {
            bytes.extend_from_slice(&(data.len() as i32).to_le_bytes());
            bytes.extend_from_slice(data);
        }
        Ok(bytes)
    }
}
