//! bmp2img - Palette image converter
//!
//! Converts an uncompressed 8-bit indexed BMP into a C array of packed
//! RGBA8888 words, written to stdout:
//!
//! ```bash
//! bmp2img assets/err_joypad.bmp > err_joypad.c
//! # const unsigned int img_err_joypad[17664] = { ... };
//! ```

mod convert;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

/// Exit status for every failure (usage, I/O or format)
const EXIT_FAILURE: i32 = -1;

#[derive(Parser)]
#[command(name = "bmp2img")]
#[command(about = "Convert an 8-bit BMP into an embeddable C pixel array")]
#[command(version)]
struct Cli {
    /// Input BMP file (8-bit indexed, uncompressed)
    input: PathBuf,

    /// Prefix prepended to the array identifier
    #[arg(short, long, default_value = "img_")]
    prefix: String,
}

fn run(cli: &Cli) -> Result<()> {
    let source = convert::convert_file(&cli.input, &cli.prefix)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(&source)
        .and_then(|_| out.flush())
        .context("Failed to write to stdout")?;

    tracing::info!("Converted {:?}", cli.input);
    Ok(())
}

fn main() {
    // Logs go to stderr; stdout carries the generated source
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
