//! BMP → C pixel array conversion

use anyhow::{Context, Result};
use std::path::Path;

use vgs0_common::codegen::is_c_identifier;
use vgs0_common::fs::{MAX_BMP_BYTES, read_input};
use vgs0_common::{BitmapError, C_UINT, decode_indexed_bmp, render_c_array, symbol_from_path};

/// Array identifier for `input`: `prefix` followed by the bare file stem.
pub fn array_name(input: &str, prefix: &str) -> String {
    format!("{}{}", prefix, symbol_from_path(input))
}

/// Convert an in-memory BMP into the complete C source text.
///
/// Nothing is produced unless the whole image decodes.
pub fn convert_bytes(bmp: &[u8], name: &str) -> Result<Vec<u8>, BitmapError> {
    let table = decode_indexed_bmp(bmp)?;
    tracing::debug!(
        "Resolved {}x{} pixels into {}",
        table.width,
        table.height,
        name
    );
    Ok(render_c_array(C_UINT, name, &table.pixels))
}

/// Read and convert a BMP file.
pub fn convert_file(input: &Path, prefix: &str) -> Result<Vec<u8>> {
    let name = array_name(&input.to_string_lossy(), prefix);
    if !is_c_identifier(&name) {
        tracing::warn!("`{}` is not a valid C identifier", name);
    }

    let bmp = read_input(input, MAX_BMP_BYTES)?;
    convert_bytes(&bmp, &name).with_context(|| format!("Failed to convert {}", input.display()))
}
