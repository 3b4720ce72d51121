//! riffscope CLI - inspect RIFF-family files
//!
//! A command-line tool for listing and extracting chunks

use anyhow::Context;
use clap::{Parser, Subcommand};
use riffscope_lib::io::{ByteOrder, DataSlice, FileSlice};
use riffscope_lib::riff::{read_chunks, Chunk, ChunkReader, ChunkSummary, Tag};
use riffscope_lib::{init, Config};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "riffscope")]
#[command(about = "riffscope - inspect RIFF-family files", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the chunk tree of a little-endian RIFF file
    Tree {
        /// Input file path
        input: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Compact JSON output (only with --json)
        #[arg(short, long)]
        compact: bool,
    },

    /// Read top-level chunks sequentially with big-endian sizes
    Stream {
        /// Input file path
        input: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Compact JSON output (only with --json)
        #[arg(short, long)]
        compact: bool,
    },

    /// Write the payload of one chunk to a file
    Extract {
        /// Input file path
        input: PathBuf,

        /// Slash-separated tag path, e.g. "WAVE/data" or "RIFF/INFO/INAM"
        #[arg(short, long)]
        path: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config {
        verbose: cli.verbose,
        debug: cli.debug,
    };

    init(config)?;

    info!("riffscope v{}", riffscope_lib::VERSION);

    match cli.command {
        Commands::Tree {
            input,
            json,
            compact,
        } => {
            info!("Reading chunk tree of: {}", input.display());
            cmd_tree(&input, json, compact)?;
        }
        Commands::Stream {
            input,
            json,
            compact,
        } => {
            info!("Streaming chunks of: {}", input.display());
            cmd_stream(&input, json, compact)?;
        }
        Commands::Extract {
            input,
            path,
            output,
        } => {
            info!("Extracting {} from {} to {}", path, input.display(), output.display());
            cmd_extract(&input, &path, &output)?;
        }
    }

    Ok(())
}

/// Parse a whole file as a sequence of little-endian chunks
fn read_tree(slice: &mut FileSlice) -> anyhow::Result<Vec<Chunk>> {
    slice.set_byte_order(ByteOrder::LittleEndian);
    let chunks = read_chunks(slice);
    if chunks.is_empty() && !slice.is_empty()? {
        anyhow::bail!("No readable chunks found");
    }
    Ok(chunks)
}

fn print_summaries(summaries: &[ChunkSummary], json: bool, compact: bool) -> anyhow::Result<()> {
    if json {
        let output = if compact {
            serde_json::to_string(summaries)?
        } else {
            serde_json::to_string_pretty(summaries)?
        };
        println!("{}", output);
    } else {
        for summary in summaries {
            print!("{}", summary);
        }
    }
    Ok(())
}

fn cmd_tree(input: &Path, json: bool, compact: bool) -> anyhow::Result<()> {
    let mut slice = FileSlice::open(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    let chunks = read_tree(&mut slice)?;
    let summaries: Vec<ChunkSummary> = chunks.iter().map(ChunkSummary::from_chunk).collect();
    print_summaries(&summaries, json, compact)?;

    if !json {
        let total: usize = summaries.iter().map(ChunkSummary::count).sum();
        println!();
        println!("{} chunk(s), {} bytes", total, slice.len()?);
    }

    slice.close()?;
    Ok(())
}

fn cmd_stream(input: &Path, json: bool, compact: bool) -> anyhow::Result<()> {
    let file = File::open(input).with_context(|| format!("Failed to open '{}'", input.display()))?;
    let mut reader = ChunkReader::new(BufReader::new(file));

    let mut summaries = Vec::new();
    while let Some(chunk) = reader
        .read_chunk()
        .with_context(|| format!("Failed to read chunk #{}", reader.chunks_read() + 1))?
    {
        summaries.push(ChunkSummary::from_chunk(&chunk));
    }

    print_summaries(&summaries, json, compact)?;
    reader.close();
    Ok(())
}

/// Turn `"WAVE/fmt"` into tags
///
/// Names shorter than four characters are padded with spaces, the way RIFF
/// writers pad `fmt ` and friends.
fn parse_tag_path(path: &str) -> anyhow::Result<Vec<Tag>> {
    let tags = path
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|part| format!("{:<4}", part).parse::<Tag>())
        .collect::<Result<Vec<_>, _>>()?;

    if tags.is_empty() {
        anyhow::bail!("Empty chunk path '{}'", path);
    }
    Ok(tags)
}

fn cmd_extract(input: &Path, path: &str, output: &Path) -> anyhow::Result<()> {
    let tags = parse_tag_path(path)?;

    let mut slice = FileSlice::open(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;
    let chunks = read_tree(&mut slice)?;

    let (first, rest) = tags.split_first().context("Empty chunk path")?;
    let chunk = chunks
        .iter()
        .filter(|chunk| chunk.matches(*first))
        .find_map(|chunk| chunk.find_path(rest))
        .with_context(|| format!("No chunk at path '{}'", path))?;

    let payload = chunk.payload().copy_out(0, chunk.size()?)?;
    std::fs::write(output, payload.as_bytes())
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    println!(
        "Extracted {} ({} bytes) to {}",
        chunk.tag(),
        payload.len()?,
        output.display()
    );

    slice.close()?;
    Ok(())
}
