//! makepkg - Game package assembler
//!
//! Bundles a program ROM with optional BGM and sound effect data into a
//! `VGS0PKG` game package, ready for `pkg2src`:
//!
//! ```bash
//! # From flags
//! makepkg -r game.rom -b bgm.dat -s se.dat -o game.pkg
//!
//! # From a manifest
//! makepkg --manifest package.toml
//! ```

mod manifest;
mod pack;

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use manifest::{DEFAULT_OUTPUT, PackageManifest};
use pack::PackageInputs;

/// Exit status for every failure (usage, I/O or format)
const EXIT_FAILURE: i32 = -1;

#[derive(Parser)]
#[command(name = "makepkg")]
#[command(about = "Assemble a ROM and audio data into a VGS0 game package")]
#[command(version)]
struct Cli {
    /// Read inputs from a package.toml manifest
    #[arg(short, long, conflicts_with_all = ["rom", "bgm", "se"])]
    manifest: Option<PathBuf>,

    /// Program ROM (at least 8200 bytes)
    #[arg(short, long, required_unless_present = "manifest")]
    rom: Option<PathBuf>,

    /// Background music data
    #[arg(short, long)]
    bgm: Option<PathBuf>,

    /// Sound effect data
    #[arg(short, long)]
    se: Option<PathBuf>,

    /// Output package (overrides the manifest)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn inputs(&self) -> Result<PackageInputs> {
        let mut inputs = match (&self.manifest, &self.rom) {
            (Some(path), _) => {
                let base_dir = path.parent().unwrap_or(Path::new("."));
                PackageManifest::load(path)?.resolve(base_dir)
            }
            (None, Some(rom)) => PackageInputs {
                rom: rom.clone(),
                bgm: self.bgm.clone(),
                se: self.se.clone(),
                output: PathBuf::from(DEFAULT_OUTPUT),
            },
            (None, None) => anyhow::bail!("Either --rom or --manifest is required"),
        };
        if let Some(output) = &self.output {
            inputs.output = output.clone();
        }
        Ok(inputs)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let inputs = cli.inputs()?;
    tracing::info!("Packing {:?} -> {:?}", inputs.rom, inputs.output);
    let summary = pack::build_package(&inputs)?;
    pack::print_summary(&inputs.output, &summary);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            std::process::exit(EXIT_FAILURE);
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("{:#}", err);
        std::process::exit(EXIT_FAILURE);
    }
}
