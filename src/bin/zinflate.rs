//! zinflate CLI - zlib/DEFLATE decompression tool
//!
//! Decodes a zlib (or raw DEFLATE) file whose decompressed size is known.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use zinflate::{inflate_raw_into, InflateOptions, Inflater};

/// Decompress a zlib stream into a buffer of known size.
#[derive(Parser, Debug)]
#[command(name = "zinflate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Compressed input file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Exact decompressed size in bytes
    #[arg(short, long, value_name = "BYTES")]
    size: usize,

    /// Output file path (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Input is raw DEFLATE with no zlib header
    #[arg(long, conflicts_with = "verify_checksum")]
    raw: bool,

    /// Verify the Adler-32 trailer
    #[arg(long)]
    verify_checksum: bool,

    /// Fail if the stream ends before SIZE bytes are produced
    #[arg(long)]
    strict: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "zinflate=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let input = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let start = Instant::now();
    let mut output = vec![0u8; args.size];

    let written = if args.raw {
        inflate_raw_into(&input, &mut output).context("failed to inflate raw stream")?
    } else {
        let options = InflateOptions::default()
            .verify_checksum(args.verify_checksum)
            .require_full_output(args.strict);
        let inflater = Inflater::with_options(&input, options).context("invalid zlib header")?;
        tracing::debug!(
            window = inflater.header().window_size(),
            level = inflater.header().level(),
            "zlib header"
        );
        inflater
            .decode_into(&mut output)
            .context("failed to inflate zlib stream")?
    };
    output.truncate(written);

    let elapsed = start.elapsed();
    tracing::info!(
        input_bytes = input.len(),
        output_bytes = written,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "decompressed {}",
        args.input.display()
    );

    match &args.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(&output)
            .context("failed to write to stdout")?,
    }

    Ok(())
}
