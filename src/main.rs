use clap::{Parser, Subcommand};
use fseq::variable::VAR_ID_MEDIA_FILE;
use fseq::SequenceLayout;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fseq", version = fseq::VERSION, about = "Inspect FSEQ v2 sequence files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header fields and a summary of the file
    Info {
        input: PathBuf,
        /// Print the decoded layout as JSON
        #[arg(long)]
        json: bool,
    },
    /// List variable records
    Vars {
        input: PathBuf,
    },
    /// List sparse channel ranges
    Ranges {
        input: PathBuf,
    },
    /// List the compression block table
    Blocks {
        input: PathBuf,
    },
    /// Hex dump the channel data of one uncompressed frame
    Frame {
        input: PathBuf,
        index: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input, json } => {
            let (_, layout) = load(&input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
                return Ok(());
            }

            let h = &layout.header;
            println!("── FSEQ Sequence ────────────────────────────────────────");
            println!("  Path           {}", input.display());
            println!("  Format version {}.{}", h.major_version, h.minor_version);
            println!("  Channels       {}", h.channel_count);
            println!("  Frames         {}", h.frame_count);
            println!("  Step time      {} ms", h.frame_step_time_millis);
            println!("  Duration       {:.2} s", h.duration_seconds());
            println!("  Compression    {} ({} blocks)", h.compression_type, h.total_compression_blocks());
            println!("  Channel ranges {}", h.channel_range_count);
            println!("  Variable data  @{}", h.variable_data_offset);
            println!("  Channel data   @{}", h.channel_data_offset);
            match h.uid_timestamp() {
                Some(ts) => println!("  Sequence UID   {} ({})", hex::encode(h.uid_bytes()), ts.to_rfc3339()),
                None     => println!("  Sequence UID   {}", hex::encode(h.uid_bytes())),
            }
            if let Some(media) = layout.variable(VAR_ID_MEDIA_FILE) {
                println!("  Media file     {}", media.value_str());
            }
        }

        // ── Vars ─────────────────────────────────────────────────────────────
        Commands::Vars { input } => {
            let (_, layout) = load(&input)?;
            println!("{:<4} {:>8} {:>6}  Value", "Id", "Offset", "Size");
            for var in &layout.variables {
                println!("{:<4} {:>8} {:>6}  {}", var.id_str(), var.offset, var.value.len(), var.value_str());
            }
        }

        // ── Ranges ───────────────────────────────────────────────────────────
        Commands::Ranges { input } => {
            let (_, layout) = load(&input)?;
            if layout.channel_ranges.is_empty() {
                println!("No sparse ranges: all {} channels stored", layout.header.channel_count);
            }
            for (i, r) in layout.channel_ranges.iter().enumerate() {
                println!("  #{:<3} channels {}..{} ({})", i, r.first_channel_number, r.end_channel(), r.channel_count);
            }
        }

        // ── Blocks ───────────────────────────────────────────────────────────
        Commands::Blocks { input } => {
            let (_, layout) = load(&input)?;
            println!("{:>5} {:>12} {:>12}", "#", "First frame", "Size");
            for (i, b) in layout.compression_blocks.iter().enumerate() {
                println!("{:>5} {:>12} {:>12}", i, b.first_frame_id, b.size);
            }
        }

        // ── Frame ────────────────────────────────────────────────────────────
        Commands::Frame { input, index } => {
            let (data, layout) = load(&input)?;
            let frame = layout.frame(&data, index)?;
            for (row, chunk) in frame.chunks(16).enumerate() {
                println!("{:08x}  {}", row * 16, hex::encode(chunk));
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn load(path: &Path) -> Result<(Vec<u8>, SequenceLayout), Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;
    let layout = SequenceLayout::parse(&data)?;
    Ok((data, layout))
}
