//! Package assembly

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use vgs0_common::fs::{MAX_SEGMENT_BYTES, read_input, write_file_atomic};
use vgs0_common::{GamePackage, Segment};

/// Resolved input and output paths for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInputs {
    pub rom: PathBuf,
    pub bgm: Option<PathBuf>,
    pub se: Option<PathBuf>,
    pub output: PathBuf,
}

/// Sizes of the segments written, for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageSummary {
    pub rom_size: usize,
    pub bgm_size: usize,
    pub se_size: usize,
    pub total_size: usize,
}

fn read_segment(path: &Path, segment: Segment) -> Result<Vec<u8>> {
    read_input(path, MAX_SEGMENT_BYTES)
        .with_context(|| format!("Failed to load {}", segment))
}

fn read_optional(path: Option<&Path>, segment: Segment) -> Result<Option<Vec<u8>>> {
    match path {
        Some(path) => {
            let data = read_segment(path, segment)?;
            if data.is_empty() {
                tracing::warn!("{} is empty; the package will have no {}", path.display(), segment);
            }
            Ok(Some(data))
        }
        None => Ok(None),
    }
}

/// Read every input, assemble the package and write it out.
pub fn build_package(inputs: &PackageInputs) -> Result<PackageSummary> {
    let rom = read_segment(&inputs.rom, Segment::Rom)?;
    let bgm = read_optional(inputs.bgm.as_deref(), Segment::Bgm)?;
    let se = read_optional(inputs.se.as_deref(), Segment::Se)?;

    let package = GamePackage {
        rom: &rom,
        bgm: bgm.as_deref(),
        se: se.as_deref(),
    };
    let bytes = package
        .to_bytes()
        .with_context(|| format!("Failed to assemble {}", inputs.output.display()))?;

    if let Some(parent) = inputs.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    write_file_atomic(&inputs.output, &bytes)?;

    Ok(PackageSummary {
        rom_size: rom.len(),
        bgm_size: package.bgm.map_or(0, <[u8]>::len),
        se_size: package.se.map_or(0, <[u8]>::len),
        total_size: bytes.len(),
    })
}

pub fn print_summary(output: &Path, summary: &PackageSummary) {
    println!("Created: {} ({} bytes)", output.display(), summary.total_size);
    println!("  {}: {} bytes", Segment::Rom, summary.rom_size);
    println!("  {}: {} bytes", Segment::Bgm, summary.bgm_size);
    println!("  {}: {} bytes", Segment::Se, summary.se_size);
}
