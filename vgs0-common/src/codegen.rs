//! C source emission for embedded asset tables
//!
//! Generated arrays are compiled verbatim by the frontend build, so the text
//! must be byte-for-byte stable for a given input:
//!
//! ```text
//! const unsigned char gamepkg[20] = {
//!     0x56, 0x47, 0x53, 0x30, 0x50, 0x4B, 0x47, 0x00, 0x08, 0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
//!     0x00, 0x00, 0x00, 0x00
//! };
//! ```
//!
//! Up to [`VALUES_PER_LINE`] values per line, each line indented by four
//! spaces, values separated by `", "` and lines by `",\n"`. Bytes are written
//! as two-digit uppercase hex, 32-bit words as unpadded uppercase hex.

use std::io::{self, Write};

/// Values emitted on each line of an array body
pub const VALUES_PER_LINE: usize = 16;

/// Indentation of array body lines
pub const INDENT: &str = "    ";

/// C element type for packed 32-bit colours
pub const C_UINT: &str = "unsigned int";

/// C element type for raw bytes
pub const C_UCHAR: &str = "unsigned char";

/// A value that can be written as a C hex literal.
pub trait HexLiteral: Copy {
    fn write_hex<W: Write>(self, out: &mut W) -> io::Result<()>;
}

impl HexLiteral for u8 {
    fn write_hex<W: Write>(self, out: &mut W) -> io::Result<()> {
        write!(out, "0x{:02X}", self)
    }
}

impl HexLiteral for u32 {
    fn write_hex<W: Write>(self, out: &mut W) -> io::Result<()> {
        write!(out, "0x{:X}", self)
    }
}

/// Incremental writer for a `const <type> <name>[<len>] = { ... };` definition.
///
/// Lets callers stream an array body line by line without holding the whole
/// table in memory.
pub struct CArrayWriter<W: Write> {
    out: W,
    first_line: bool,
}

impl<W: Write> CArrayWriter<W> {
    /// Write the declaration line and return a writer for the body.
    pub fn begin(mut out: W, c_type: &str, name: &str, len: usize) -> io::Result<Self> {
        writeln!(out, "const {} {}[{}] = {{", c_type, name, len)?;
        Ok(Self {
            out,
            first_line: true,
        })
    }

    /// Write one body line. Callers keep lines at most [`VALUES_PER_LINE`] long.
    pub fn write_line<T: HexLiteral>(&mut self, values: &[T]) -> io::Result<()> {
        if self.first_line {
            self.first_line = false;
        } else {
            self.out.write_all(b",\n")?;
        }
        self.out.write_all(INDENT.as_bytes())?;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.out.write_all(b", ")?;
            }
            value.write_hex(&mut self.out)?;
        }
        Ok(())
    }

    /// Close the array and hand back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.write_all(b"\n};\n")?;
        Ok(self.out)
    }
}

/// Write a complete array definition for `values`.
pub fn write_c_array<W: Write, T: HexLiteral>(
    out: W,
    c_type: &str,
    name: &str,
    values: &[T],
) -> io::Result<W> {
    let mut writer = CArrayWriter::begin(out, c_type, name, values.len())?;
    for line in values.chunks(VALUES_PER_LINE) {
        writer.write_line(line)?;
    }
    writer.finish()
}

/// Render a complete array definition into memory.
pub fn render_c_array<T: HexLiteral>(c_type: &str, name: &str, values: &[T]) -> Vec<u8> {
    // Writing into a Vec cannot fail
    write_c_array(Vec::new(), c_type, name, values).unwrap_or_default()
}

/// Write the companion header declaring an array and its length.
pub fn write_extern_header<W: Write>(
    mut out: W,
    c_type: &str,
    name: &str,
    len: usize,
) -> io::Result<W> {
    writeln!(out, "#pragma once")?;
    writeln!(out)?;
    writeln!(out, "extern \"C\" {{")?;
    writeln!(out, "{}extern const {} {}[{}];", INDENT, c_type, name, len)?;
    writeln!(out, "}}")?;
    Ok(out)
}

/// Derive an array identifier from an asset path.
///
/// Strips everything up to the last `/` or `\` and everything from the first
/// `.` of the remaining file name: `./assets/sub/err_joypad.bmp` → `err_joypad`.
pub fn symbol_from_path(path: &str) -> &str {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file_name.split_once('.') {
        Some((stem, _)) => stem,
        None => file_name,
    }
}

/// Whether `name` is usable as a C identifier.
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Parse every `0x..` token of a generated array body back into numbers.
///
/// Used by tests to check that emitted tables decode to their source data.
#[cfg(any(test, feature = "test-utils"))]
pub fn parse_hex_tokens(text: &str) -> Vec<u64> {
    let body = match (text.find('{'), text.rfind('}')) {
        (Some(open), Some(close)) if open < close => &text[open + 1..close],
        _ => return Vec::new(),
    };
    body.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.strip_prefix("0x"))
        .filter_map(|hex| u64::from_str_radix(hex, 16).ok())
        .collect()
}
