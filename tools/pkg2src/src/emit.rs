//! Streaming byte-array emission

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use vgs0_common::fs::FILE_OPEN_ERROR;
use vgs0_common::{C_UCHAR, CArrayWriter, VALUES_PER_LINE, write_extern_header};

/// Files written for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedSource {
    pub source_path: PathBuf,
    pub header_path: PathBuf,
    pub size: usize,
}

/// Fill `buf` as far as the reader allows. Returns 0 only at end of input.
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Stream `input` into an array definition, one line per 16-byte chunk.
///
/// `declared` is the length written into the declaration; the run fails if
/// the input turns out to be a different length.
pub fn write_byte_array<R: Read, W: Write>(
    mut input: R,
    declared: usize,
    name: &str,
    out: W,
) -> Result<W> {
    let mut writer = CArrayWriter::begin(out, C_UCHAR, name, declared)?;
    let mut chunk = [0u8; VALUES_PER_LINE];
    let mut total = 0usize;
    loop {
        let n = read_chunk(&mut input, &mut chunk).context("Failed to read input")?;
        if n == 0 {
            break;
        }
        writer.write_line(&chunk[..n])?;
        total += n;
    }
    if total != declared {
        anyhow::bail!(
            "Input changed while reading ({} bytes declared, {} bytes read)",
            declared,
            total
        );
    }
    Ok(writer.finish()?)
}

/// Write `<name>.c` and `<name>.h` for `input` into `out_dir`.
pub fn emit_package_source(input: &Path, name: &str, out_dir: &Path) -> Result<EmittedSource> {
    let file = File::open(input).context(FILE_OPEN_ERROR)?;
    let size = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", input.display()))?
        .len();
    let size = usize::try_from(size)
        .with_context(|| format!("Input too large: {} bytes", size))?;

    let source_path = out_dir.join(format!("{}.c", name));
    let header_path = out_dir.join(format!("{}.h", name));

    let header = File::create(&header_path)
        .with_context(|| format!("Failed to create {}", header_path.display()))?;
    write_extern_header(BufWriter::new(header), C_UCHAR, name, size)
        .and_then(|mut w| w.flush())
        .with_context(|| format!("Failed to write {}", header_path.display()))?;

    let source = File::create(&source_path)
        .with_context(|| format!("Failed to create {}", source_path.display()))?;
    let mut out = write_byte_array(BufReader::new(file), size, name, BufWriter::new(source))
        .with_context(|| format!("Failed to write {}", source_path.display()))?;
    out.flush()
        .with_context(|| format!("Failed to write {}", source_path.display()))?;

    Ok(EmittedSource {
        source_path,
        header_path,
        size,
    })
}
