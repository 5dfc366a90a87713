//! pkg2src - Package builder
//!
//! Re-encodes any binary file (normally a `.pkg` game package) as C source
//! the frontend compiles in:
//!
//! ```bash
//! pkg2src game.pkg
//! # writes gamepkg.c  (const unsigned char gamepkg[N] = { ... };)
//! # writes gamepkg.h  (extern const unsigned char gamepkg[N];)
//! ```

mod emit;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Exit status for every failure (usage or I/O)
const EXIT_FAILURE: i32 = -1;

#[derive(Parser)]
#[command(name = "pkg2src")]
#[command(about = "Convert a binary file into an embeddable C byte array")]
#[command(version)]
struct Cli {
    /// Input file (any binary, usually a game package)
    input: PathBuf,

    /// Array identifier and output file stem
    #[arg(short, long, default_value = "gamepkg")]
    name: String,

    /// Directory the .c and .h files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

fn run(cli: &Cli) -> Result<()> {
    tracing::info!("Converting {:?}", cli.input);
    let emitted = emit::emit_package_source(&cli.input, &cli.name, &cli.out_dir)?;
    tracing::info!(
        "Wrote {} and {} ({} bytes)",
        emitted.source_path.display(),
        emitted.header_path.display(),
        emitted.size
    );
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
