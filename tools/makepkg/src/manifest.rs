//! package.toml manifest parsing
//!
//! ```toml
//! [package]
//! rom = "game.rom"
//! bgm = "bgm.dat"      # optional
//! se = "se.dat"        # optional
//! output = "game.pkg"  # optional, defaults to game.pkg
//! ```
//!
//! Relative paths are resolved against the directory holding the manifest.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::pack::PackageInputs;

/// Output file name used when none is given
pub const DEFAULT_OUTPUT: &str = "game.pkg";

/// package.toml manifest structure
#[derive(Debug, Deserialize)]
pub struct PackageManifest {
    pub package: PackageSection,
}

/// Package inputs section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    /// Program ROM (required, at least 8200 bytes)
    pub rom: PathBuf,
    /// Background music data
    #[serde(default)]
    pub bgm: Option<PathBuf>,
    /// Sound effect data
    #[serde(default)]
    pub se: Option<PathBuf>,
    /// Package to write
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl PackageManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }

    /// Resolve every path against `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> PackageInputs {
        let section = &self.package;
        PackageInputs {
            rom: base_dir.join(&section.rom),
            bgm: section.bgm.as_ref().map(|p| base_dir.join(p)),
            se: section.se.as_ref().map(|p| base_dir.join(p)),
            output: base_dir.join(
                section
                    .output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let manifest: PackageManifest = toml::from_str(
            r#"
            [package]
            rom = "build/game.rom"
            bgm = "bgm.dat"
            se = "se.dat"
            output = "out/battle.pkg"
            "#,
        )
        .unwrap();

        let inputs = manifest.resolve(Path::new("/proj"));
        assert_eq!(inputs.rom, Path::new("/proj/build/game.rom"));
        assert_eq!(inputs.bgm.as_deref(), Some(Path::new("/proj/bgm.dat")));
        assert_eq!(inputs.se.as_deref(), Some(Path::new("/proj/se.dat")));
        assert_eq!(inputs.output, Path::new("/proj/out/battle.pkg"));
    }

    #[test]
    fn test_parse_rom_only() {
        let manifest: PackageManifest = toml::from_str("[package]\nrom = \"game.rom\"\n").unwrap();
        let inputs = manifest.resolve(Path::new("proj"));
        assert!(inputs.bgm.is_none());
        assert!(inputs.se.is_none());
        assert_eq!(inputs.output, Path::new("proj").join(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_missing_rom_is_error() {
        let result: Result<PackageManifest, _> = toml::from_str("[package]\nbgm = \"bgm.dat\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_key_is_error() {
        let result: Result<PackageManifest, _> =
            toml::from_str("[package]\nrom = \"game.rom\"\nmusic = \"bgm.dat\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.toml");
        let err = PackageManifest::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read manifest"));
    }
}
