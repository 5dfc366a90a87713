//! Filesystem helpers shared by the packaging tools.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Context attached to every failure to open or read a tool input
pub const FILE_OPEN_ERROR: &str = "file open error";

/// Maximum bitmap size read into memory.
pub const MAX_BMP_BYTES: u64 = 64 * 1024 * 1024; // 64 MiB
/// Maximum size of a single package segment source (ROM, BGM or SE).
pub const MAX_SEGMENT_BYTES: u64 = i32::MAX as u64;

/// Read a tool input in full, refusing files over `max_bytes`.
///
/// The size is checked against what was actually read, not against
/// metadata, so a file that grows after opening is still capped.
pub fn read_input(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let file = File::open(path).context(FILE_OPEN_ERROR)?;
    let mut data = Vec::new();
    file.take(max_bytes.saturating_add(1))
        .read_to_end(&mut data)
        .context(FILE_OPEN_ERROR)?;
    if data.len() as u64 > max_bytes {
        anyhow::bail!("{} exceeds the {} byte limit", path.display(), max_bytes);
    }
    tracing::debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

/// Write `bytes` to `path` through a sibling temporary file and a rename, so
/// a failed run never leaves a half-written output behind.
pub fn write_file_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Output path has no file name: {}", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, bytes)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;

    #[cfg(windows)]
    {
        if path.exists() {
            // Windows rename fails if destination exists.
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to replace {}", path.display()))?;
        }
    }

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move output into place: {}", path.display()))?;
    Ok(())
}
